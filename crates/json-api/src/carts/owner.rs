//! Cart owner resolution middleware.
//!
//! Every cart route acts on the caller's own cart. The owner comes from the
//! `X-User-ID` header, or `X-Session-ID` for guests.

use salvo::prelude::*;

use cartstore_app::domain::carts::resolve_owner;

use crate::extensions::*;

pub(crate) const USER_ID_HEADER: &str = "x-user-id";
pub(crate) const SESSION_ID_HEADER: &str = "x-session-id";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let user_id = req.header::<String>(USER_ID_HEADER);
    let session_id = req.header::<String>(SESSION_ID_HEADER);

    let Ok(owner) = resolve_owner(user_id.as_deref(), session_id.as_deref()) else {
        res.render(StatusError::bad_request().brief("Missing X-User-ID or X-Session-ID header"));
        ctrl.skip_rest();

        return;
    };

    depot.insert_cart_owner(owner);

    ctrl.call_next(req, depot, res).await;
}
