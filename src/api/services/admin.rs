//! Admin endpoints
//!
//! All routes here sit behind the AdminGuard middleware; handlers map the
//! admin service's state-machine errors to domain error codes.

use actix_web::http::StatusCode;
use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::info;

use crate::api::middleware::CurrentUser;
use crate::errors::AgentHubError;
use crate::services::AdminService;
use crate::storage::HubStorage;

use super::agents::{agents_with_authors, clamp_page};
use super::error_code::ErrorCode;
use super::helpers::{error_from_hub, error_response, success_response, success_with_message};
use super::types::{AgentApprovalRequest, ListUsersQuery, PageQuery, UserResponse};

fn user_workflow_error(err: AgentHubError, validation_code: ErrorCode) -> actix_web::HttpResponse {
    match err {
        AgentHubError::NotFound(msg) => {
            error_response(StatusCode::NOT_FOUND, ErrorCode::UserNotFound, &msg)
        }
        AgentHubError::Validation(msg) => {
            error_response(StatusCode::BAD_REQUEST, validation_code, &msg)
        }
        other => error_from_hub(&other),
    }
}

/// GET /admin/pending-agents
pub async fn pending_agents(
    query: web::Query<PageQuery>,
    _admin: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let (skip, limit) = clamp_page(query.skip, query.limit);

    let agents = match storage.list_pending_agents(skip, limit).await {
        Ok(agents) => agents,
        Err(e) => return Ok(error_from_hub(&e)),
    };

    match agents_with_authors(&storage, agents).await {
        Ok(responses) => Ok(success_response(responses)),
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// PATCH /admin/agents/{id}/approve - approve or reject a submission
pub async fn review_agent(
    path: web::Path<i64>,
    body: web::Json<AgentApprovalRequest>,
    admin: CurrentUser,
    service: web::Data<Arc<AdminService>>,
) -> ActixResult<impl Responder> {
    let agent_id = path.into_inner();

    match service
        .review_agent(agent_id, &admin, body.approve, body.rejection_reason.clone())
        .await
    {
        Ok(agent) => {
            info!("Admin API: agent {} -> {}", agent_id, agent.status);
            Ok(success_with_message(
                format!("Agent {} successfully", agent.status),
                serde_json::json!({
                    "agent_id": agent_id,
                    "status": agent.status,
                }),
            ))
        }
        Err(AgentHubError::NotFound(msg)) => Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::AgentNotFound,
            &msg,
        )),
        Err(AgentHubError::Validation(msg)) => Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::AgentAlreadyReviewed,
            &msg,
        )),
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// GET /admin/users
pub async fn list_users(
    query: web::Query<ListUsersQuery>,
    _admin: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let (skip, limit) = clamp_page(query.skip, query.limit);
    let include_inactive = query.include_inactive.unwrap_or(true);

    match storage.list_users(include_inactive, skip, limit).await {
        Ok(users) => {
            let responses: Vec<UserResponse> =
                users.iter().map(UserResponse::from_user).collect();
            Ok(success_response(responses))
        }
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// GET /admin/users/pending
pub async fn pending_users(
    _admin: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_pending_users().await {
        Ok(users) => {
            let responses: Vec<UserResponse> =
                users.iter().map(UserResponse::from_user).collect();
            Ok(success_response(responses))
        }
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// PATCH /admin/users/{id}/approve
pub async fn approve_user(
    path: web::Path<i64>,
    admin: CurrentUser,
    service: web::Data<Arc<AdminService>>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();

    match service.approve_user(user_id, &admin).await {
        Ok(_) => Ok(success_with_message(
            "User approved successfully",
            serde_json::json!({ "user_id": user_id }),
        )),
        Err(e) => Ok(user_workflow_error(e, ErrorCode::UserAlreadyActive)),
    }
}

/// PATCH /admin/users/{id}/deactivate
pub async fn deactivate_user(
    path: web::Path<i64>,
    admin: CurrentUser,
    service: web::Data<Arc<AdminService>>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();

    match service.deactivate_user(user_id, &admin).await {
        Ok(_) => Ok(success_with_message(
            "User deactivated successfully",
            serde_json::json!({ "user_id": user_id }),
        )),
        Err(e) => Ok(user_workflow_error(e, ErrorCode::UserAlreadyInactive)),
    }
}

/// DELETE /admin/users/{id}/reject - remove a pending registration
pub async fn reject_user(
    path: web::Path<i64>,
    admin: CurrentUser,
    service: web::Data<Arc<AdminService>>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();

    match service.reject_user(user_id, &admin).await {
        Ok(()) => Ok(success_with_message(
            "User rejected and removed successfully",
            serde_json::json!({ "user_id": user_id }),
        )),
        Err(e) => Ok(user_workflow_error(e, ErrorCode::UserAlreadyActive)),
    }
}

/// PATCH /admin/users/{id}/make-admin
pub async fn make_admin(
    path: web::Path<i64>,
    _admin: CurrentUser,
    service: web::Data<Arc<AdminService>>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();

    match service.make_admin(user_id).await {
        Ok(user) => Ok(success_with_message(
            "User granted admin role successfully",
            serde_json::json!({
                "user_id": user_id,
                "roles": user.roles,
            }),
        )),
        Err(e) => Ok(user_workflow_error(e, ErrorCode::AlreadyAdmin)),
    }
}

/// GET /admin/stats - dashboard aggregates
pub async fn stats(
    _admin: CurrentUser,
    service: web::Data<Arc<AdminService>>,
) -> ActixResult<impl Responder> {
    match service.dashboard_stats().await {
        Ok(stats) => Ok(success_response(stats)),
        Err(e) => Ok(error_from_hub(&e)),
    }
}
