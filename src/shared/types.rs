use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Outcome marker carried by every response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
}

/// Uniform `{status, data|message}` envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
            message,
        }
    }

    pub fn fail(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            status: ResponseStatus::Fail,
            data: None,
            message: Some(message.into()),
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Offset pagination query parameters.
///
/// Values are kept as raw strings so that malformed input falls back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Number of items to return (default: 20, max: 100)
    #[param(value_type = Option<i64>, minimum = 1, maximum = 100)]
    pub limit: Option<String>,

    /// Number of items to skip (default: 0)
    #[param(value_type = Option<i64>, minimum = 0)]
    pub offset: Option<String>,
}

impl PaginationQuery {
    /// Requested page size, clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> i64 {
        parse_or(self.limit.as_deref(), DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Requested offset, never negative
    pub fn offset(&self) -> i64 {
        parse_or(self.offset.as_deref(), 0).max(0)
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}
