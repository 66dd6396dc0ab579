mod error;
mod handler;
mod router;

pub use error::{ApiErrorCode, ApiFailure, recover_error};
pub use router::{routes, with_verification};
