//! App Router

use salvo::Router;

use crate::{admin, carts, healthcheck, observability};

/// Routes served by the API, without the server-wide hoops.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(Router::with_path("cart/merge").post(carts::merge::handler))
        .push(
            Router::with_path("cart")
                .hoop(carts::owner::handler)
                .get(carts::get::handler)
                .delete(carts::delete::handler)
                .push(Router::with_path("clear").post(carts::clear::handler))
                .push(Router::with_path("validate").post(carts::validate::handler))
                .push(Router::with_path("extend").post(carts::extend::handler))
                .push(Router::with_path("summary").get(carts::summary::handler))
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{product_id}")
                                .put(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(Router::with_path("admin/carts/cleanup").post(admin::cleanup::handler))
}
