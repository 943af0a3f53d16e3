//! API request/response type definitions

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::storage::models::{Agent, AgentCategory, AgentStatus, RatingStats, Review, User};

/// ts-rs output path for the web client
pub const TS_EXPORT_PATH: &str = "../web/src/services/types.generated.ts";

/// Uniform response envelope
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

// ============ Auth ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct RegisterAck {
    pub user_id: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LoginRequest {
    pub username: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct OtpIssuedResponse {
    /// Present only with the development (log) notifier backend
    pub otp_code: Option<String>,
    pub expires_in_minutes: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct OtpVerifyRequest {
    pub username: String,
    pub otp_code: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

// ============ Users ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub roles: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            roles: user.roles.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
            approved_at: user.approved_at,
        }
    }

    /// Public view with the email hidden (non-admin callers)
    pub fn masked(user: &User) -> Self {
        let mut response = Self::from_user(user);
        response.email = "***@***.***".to_string();
        response
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ListUsersQuery {
    pub include_inactive: Option<bool>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MyStatsResponse {
    pub agents: MyAgentCounts,
    pub engagement: MyEngagement,
    pub profile: MyProfile,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MyAgentCounts {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MyEngagement {
    pub total_views: u64,
    pub most_popular_agent: Option<PopularAgent>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PopularAgent {
    pub id: i64,
    pub name: String,
    pub views: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MyProfile {
    pub member_since: DateTime<Utc>,
    pub roles: Vec<String>,
    pub is_admin: bool,
}

// ============ Agents ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AgentCreateRequest {
    pub name: String,
    pub description: String,
    pub app_url: String,
    pub category: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AgentResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub app_url: String,
    pub category: AgentCategory,
    pub status: AgentStatus,
    pub created_at: DateTime<Utc>,
    pub author: UserResponse,
    pub view_count: i64,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl AgentResponse {
    pub fn from_parts(agent: &Agent, author: UserResponse) -> Self {
        Self {
            id: agent.id,
            name: agent.name.clone(),
            description: agent.description.clone(),
            app_url: agent.app_url.clone(),
            category: agent.category,
            status: agent.status,
            created_at: agent.created_at,
            author,
            view_count: agent.view_count,
            approved_at: agent.approved_at,
            rejection_reason: agent.rejection_reason.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AgentListResponse {
    pub agents: Vec<AgentResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct GetAgentsQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PageQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CategoryResponse {
    pub value: AgentCategory,
    pub label: String,
    pub count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AgentApprovalRequest {
    pub approve: bool,
    pub rejection_reason: Option<String>,
}

// ============ Engagement tracking ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TrackClickRequest {
    pub click_type: String,
    pub referrer: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ClickAck {
    pub agent_id: i64,
    pub click_type: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TrackSessionRequest {
    pub duration_seconds: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SessionAck {
    pub agent_id: i64,
    pub duration_seconds: f64,
    pub accepted: bool,
}

// ============ Ratings and reviews ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct RatingCreateRequest {
    pub rating: i16,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct RatingAck {
    pub rating: i16,
    pub average_rating: f64,
    pub total_ratings: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ReviewCreateRequest {
    pub rating: i16,
    pub review_text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ReviewResponse {
    pub id: i64,
    pub agent_id: i64,
    pub user_id: i64,
    pub rating: i16,
    pub review_text: String,
    pub helpful_count: i64,
    pub reviewed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserResponse,
}

impl ReviewResponse {
    pub fn from_parts(review: &Review, user: UserResponse) -> Self {
        Self {
            id: review.id,
            agent_id: review.agent_id,
            user_id: review.user_id,
            rating: review.rating,
            review_text: review.review_text.clone(),
            helpful_count: review.helpful_count,
            reviewed_at: review.reviewed_at,
            updated_at: review.updated_at,
            user,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct RatingStatsResponse {
    pub average_rating: f64,
    pub rating_count: u64,
    pub review_count: u64,
    /// Histogram keyed by star value "1".."5"
    pub rating_distribution: BTreeMap<String, u64>,
}

impl From<RatingStats> for RatingStatsResponse {
    fn from(stats: RatingStats) -> Self {
        let rating_distribution = stats
            .distribution
            .iter()
            .enumerate()
            .map(|(i, count)| ((i + 1).to_string(), *count))
            .collect();

        Self {
            average_rating: stats.average_rating,
            rating_count: stats.rating_count,
            review_count: stats.review_count,
            rating_distribution,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HelpfulAck {
    pub helpful_count: i64,
}

// ============ Health ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_stats_response_distribution_keys() {
        let stats = RatingStats {
            average_rating: 4.5,
            rating_count: 3,
            review_count: 1,
            distribution: [0, 0, 0, 1, 2],
        };
        let response = RatingStatsResponse::from(stats);
        assert_eq!(response.rating_distribution.len(), 5);
        assert_eq!(response.rating_distribution["4"], 1);
        assert_eq!(response.rating_distribution["5"], 2);
        assert_eq!(response.rating_distribution["1"], 0);
    }
}
