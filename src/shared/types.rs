use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Envelope wrapped around every JSON response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            message: message.unwrap_or_else(|| "Success".to_string()),
            data,
            errors: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            message,
            data: None,
            errors,
            timestamp: Utc::now(),
        }
    }
}

/// Optional owner override accepted by create endpoints; defaults to the caller
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OwnerQuery {
    /// Create on behalf of this user (admins only, unless it is the caller)
    pub user_id: Option<i32>,
}

/// Acknowledgement body for endpoints that return no payload (deletes)
pub fn message_only(message: &str) -> ApiResponse<()> {
    ApiResponse::success(None, Some(message.to_string()))
}
