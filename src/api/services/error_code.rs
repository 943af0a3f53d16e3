//! Unified API error code definitions

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use super::types::TS_EXPORT_PATH;

use crate::errors::AgentHubError;

/// API error code enum
///
/// Serialized as numbers via serde_repr; ts-rs generates the TypeScript
/// type. Partitioned by thousands:
/// - 0: success
/// - 1000-1099: common errors
/// - 2000-2099: auth errors
/// - 3000-3099: agent errors
/// - 4000-4099: engagement tracking errors
/// - 5000-5099: rating/review errors
/// - 6000-6099: user management errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // Success
    Success = 0,

    // Common errors 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1006,
    RateLimitExceeded = 1010,

    // Auth errors 2000-2099
    AuthFailed = 2000,
    OtpExpired = 2001,
    OtpInvalid = 2002,
    AccountNotActivated = 2003,
    TokenInvalid = 2004,

    // Agent errors 3000-3099
    AgentNotFound = 3000,
    InvalidCategory = 3001,
    InvalidUrl = 3002,
    AgentAlreadyReviewed = 3003,
    AgentNotApproved = 3004,

    // Engagement errors 4000-4099
    InvalidClickType = 4000,
    InvalidDuration = 4001,

    // Rating/review errors 5000-5099
    ReviewNotFound = 5000,
    InvalidRating = 5001,
    InvalidReviewText = 5002,
    OwnReviewVote = 5003,

    // User management errors 6000-6099
    UserNotFound = 6000,
    UserAlreadyActive = 6001,
    UserAlreadyInactive = 6002,
    CannotModifySelf = 6003,
    AlreadyAdmin = 6004,
    UserNotActive = 6005,
}

impl From<&AgentHubError> for ErrorCode {
    fn from(err: &AgentHubError) -> Self {
        match err {
            AgentHubError::Validation(_) => ErrorCode::BadRequest,
            AgentHubError::Authentication(_) => ErrorCode::AuthFailed,
            AgentHubError::Forbidden(_) => ErrorCode::Forbidden,
            AgentHubError::NotFound(_) => ErrorCode::NotFound,
            AgentHubError::Conflict(_) => ErrorCode::Conflict,
            AgentHubError::DatabaseConfig(_)
            | AgentHubError::DatabaseConnection(_)
            | AgentHubError::DatabaseOperation(_)
            | AgentHubError::Serialization(_)
            | AgentHubError::Notify(_) => ErrorCode::InternalServerError,
        }
    }
}
