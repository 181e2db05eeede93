//! Domain-specific error types for epic-consult
//!
//! The engine itself is total and never returns these; they cover the
//! transports, the consultation store and the report renderer.

use serde_json::json;
use thiserror::Error;

/// Main error type for the epic-consult service
#[derive(Error, Debug)]
pub enum EpicConsultError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("MCP protocol error: {message}")]
    Mcp { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EpicConsultError {
    /// True when the caller sent something we cannot act on.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EpicConsultError::Validation { .. }
                | EpicConsultError::InvalidParams { .. }
                | EpicConsultError::NotFound { .. }
                | EpicConsultError::Mcp { .. }
        )
    }
}

impl From<anyhow::Error> for EpicConsultError {
    fn from(err: anyhow::Error) -> Self {
        EpicConsultError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for EpicConsultError {
    fn from(err: serde_json::Error) -> Self {
        EpicConsultError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EpicConsultError {
    fn from(err: std::io::Error) -> Self {
        EpicConsultError::Store {
            message: format!("I/O failure: {}", err),
        }
    }
}

impl From<rmcp::ErrorData> for EpicConsultError {
    fn from(err: rmcp::ErrorData) -> Self {
        EpicConsultError::Mcp {
            message: err.message.to_string(),
        }
    }
}

/// Convert EpicConsultError to MCP error
impl From<EpicConsultError> for rmcp::ErrorData {
    fn from(err: EpicConsultError) -> Self {
        let (code, label, details) = match err {
            EpicConsultError::Config { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Configuration error",
                message,
            ),
            EpicConsultError::Validation { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "Validation error",
                message,
            ),
            EpicConsultError::InvalidParams { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "Invalid parameters",
                message,
            ),
            EpicConsultError::NotFound { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "Not found",
                message,
            ),
            EpicConsultError::Mcp { message } => (
                rmcp::model::ErrorCode::INVALID_PARAMS,
                "MCP protocol error",
                message,
            ),
            EpicConsultError::Serialization { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Serialization error",
                message,
            ),
            EpicConsultError::Store { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Store error",
                message,
            ),
            EpicConsultError::Render { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Render error",
                message,
            ),
            EpicConsultError::Timeout {
                operation,
                timeout_ms,
            } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Operation timeout",
                format!("{operation} timed out after {timeout_ms}ms"),
            ),
            EpicConsultError::Internal { message } => (
                rmcp::model::ErrorCode::INTERNAL_ERROR,
                "Internal error",
                message,
            ),
        };

        rmcp::ErrorData {
            code,
            message: format!("{label}: {details}").into(),
            data: Some(json!({ "details": details })),
        }
    }
}

/// Result type alias for epic-consult operations
pub type Result<T> = std::result::Result<T, EpicConsultError>;
