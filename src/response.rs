use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope: `{success, message, data, count?}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            count: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Wrap a listing, reporting its length in `count`.
    pub fn list(message: impl Into<String>, items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            success: true,
            message: message.into(),
            data: Some(items),
            count: Some(count),
        }
    }
}
