//! Error types for the dispatch core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("No operation registered for '{handler_type}_{method}'")]
    UnknownOperation { handler_type: String, method: String },

    #[error("Invalid wire value: {0}")]
    InvalidWireValue(String),

    #[error("Handle not found: {0}")]
    HandleNotFound(String),

    #[error("Operation failed: {0}")]
    OperationFailed(anyhow::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<anyhow::Error> for BridgeError {
    fn from(err: anyhow::Error) -> Self {
        BridgeError::OperationFailed(err)
    }
}

impl BridgeError {
    /// Get error code for wire protocol
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::UnknownOperation { .. } => "UNKNOWN_OPERATION",
            BridgeError::InvalidWireValue(_) => "INVALID_WIRE_VALUE",
            BridgeError::HandleNotFound(_) => "HANDLE_NOT_FOUND",
            BridgeError::OperationFailed(_) => "OPERATION_FAILED",
            _ => "INTERNAL_ERROR",
        }
    }
}
