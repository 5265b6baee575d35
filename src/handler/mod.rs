pub mod quote_handler;
pub mod newsletter_handler;
pub mod tracking_handler;
pub mod realisation_handler;

use crate::util::error::{HandlerError, ServiceError};

/// Default mapping from service failures to HTTP errors. Internal
/// failures get a generic message; the underlying detail rides along in
/// `details` only for development builds.
pub(crate) fn map_service_error(err: ServiceError, development: bool) -> HandlerError {
    match err {
        ServiceError::NotFound(msg) => HandlerError::not_found(msg),
        ServiceError::InvalidInput(msg) => HandlerError::bad_request(msg),
        ServiceError::Conflict(msg) => HandlerError::conflict(msg),
        ServiceError::InternalError(msg) => {
            HandlerError::internal("Internal server error").with_details(development.then_some(msg))
        }
    }
}
