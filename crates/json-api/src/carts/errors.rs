//! Errors

use salvo::http::StatusError;
use tracing::error;

use cartstore_app::domain::carts::{CartsServiceError, ErrorKind};

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::Storage(source) => {
            error!(error = %source, cause = ?std::error::Error::source(&source), "cart storage failed");

            StatusError::internal_server_error()
        }
        CartsServiceError::Catalog(source) => {
            error!(error = %source, cause = ?std::error::Error::source(&source), "product catalog failed");

            StatusError::internal_server_error()
        }
        other => {
            let brief = other.to_string();

            match other.kind() {
                ErrorKind::Validation => StatusError::bad_request().brief(brief),
                ErrorKind::NotFound => StatusError::not_found().brief(brief),
                ErrorKind::Conflict => StatusError::conflict().brief(brief),
                ErrorKind::Internal => StatusError::internal_server_error(),
            }
        }
    }
}
