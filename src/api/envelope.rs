use serde::{Deserialize, Serialize};

// ============================================================================
// Response Envelope
// ============================================================================

/// Uniform wrapper for every response the boundary renders:
/// `{success, data, message, errors}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn error_with_details(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            errors,
        }
    }
}
