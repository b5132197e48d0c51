//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use lineup_core::domain::QueueError;
use lineup_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Queue(e) => queue_error(e),
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::InvalidState(msg) => ErrorObjectOwned::owned(code::CONFLICT, msg, None::<()>),
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

fn queue_error(err: QueueError) -> ErrorObjectOwned {
    let code = match err {
        QueueError::NotFound { .. } => code::NOT_FOUND,
        QueueError::InvalidCapacity { .. } => code::VALIDATION_ERROR,
        QueueError::AlreadyIn { .. } | QueueError::NotIn { .. } => code::CONFLICT,
    };
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}
