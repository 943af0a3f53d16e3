//! Agent catalog endpoints

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use chrono::Duration;
use std::str::FromStr;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{info, warn};

use crate::api::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, VIEW_DEDUP_WINDOW_MINUTES};
use crate::api::middleware::CurrentUser;
use crate::services::notify::{Notifier, send_detached};
use crate::storage::{Agent, AgentCategory, AgentFilter, AgentStatus, HubStorage, NewAgent};
use crate::utils::url_validator::validate_url;

use super::error_code::ErrorCode;
use super::helpers::{error_from_hub, error_response, success_response};
use super::types::{
    AgentCreateRequest, AgentListResponse, AgentResponse, CategoryResponse, GetAgentsQuery,
    UserResponse,
};

/// Clamp skip/limit query values the way every listing endpoint does
pub fn clamp_page(skip: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let skip = skip.unwrap_or(0);
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    (skip, limit)
}

/// Resolve the author for each agent and assemble responses
pub async fn agents_with_authors(
    storage: &HubStorage,
    agents: Vec<Agent>,
) -> crate::errors::Result<Vec<AgentResponse>> {
    let mut responses = Vec::with_capacity(agents.len());
    for agent in agents {
        match storage.find_user(agent.author_id).await? {
            Some(author) => {
                responses.push(AgentResponse::from_parts(
                    &agent,
                    UserResponse::from_user(&author),
                ));
            }
            None => {
                warn!("Agent {} has no author row ({})", agent.id, agent.author_id);
            }
        }
    }
    Ok(responses)
}

/// GET /agents - filtered catalog listing
pub async fn get_agents(
    _req: HttpRequest,
    query: web::Query<GetAgentsQuery>,
    user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let (skip, limit) = clamp_page(query.skip, query.limit);

    // Non-admins only ever see the approved catalog
    let status = if user.is_admin() {
        match query.status.as_deref() {
            None | Some("") => Some(AgentStatus::Approved),
            Some(raw) => match AgentStatus::from_str(raw) {
                Ok(status) => Some(status),
                Err(e) => {
                    return Ok(error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::BadRequest,
                        &e,
                    ));
                }
            },
        }
    } else {
        Some(AgentStatus::Approved)
    };

    let category = match query.category.as_deref() {
        None | Some("") => None,
        Some(raw) => match AgentCategory::from_str(raw) {
            Ok(category) => Some(category),
            Err(e) => {
                return Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidCategory,
                    &e,
                ));
            }
        },
    };

    let filter = AgentFilter {
        status,
        category,
        search: query.search.clone().filter(|s| !s.is_empty()),
        author_id: None,
    };

    let (agents, total) = match storage.list_agents(&filter, skip, limit).await {
        Ok(result) => result,
        Err(e) => return Ok(error_from_hub(&e)),
    };

    let agents = match agents_with_authors(&storage, agents).await {
        Ok(agents) => agents,
        Err(e) => return Ok(error_from_hub(&e)),
    };

    Ok(success_response(AgentListResponse {
        agents,
        total,
        limit,
        offset: skip,
    }))
}

/// POST /agents - submit a new agent
pub async fn create_agent(
    body: web::Json<AgentCreateRequest>,
    user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
    notifier: web::Data<Arc<dyn Notifier>>,
) -> ActixResult<impl Responder> {
    let category = match AgentCategory::from_str(&body.category) {
        Ok(category) => category,
        Err(e) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidCategory,
                &e,
            ));
        }
    };

    if let Err(e) = validate_url(&body.app_url) {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidUrl,
            &e,
        ));
    }

    if body.name.trim().is_empty() || body.description.trim().is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Name and description must not be empty",
        ));
    }

    let agent = match storage
        .insert_agent(NewAgent {
            name: body.name.trim().to_string(),
            description: body.description.clone(),
            app_url: body.app_url.trim().to_string(),
            category,
            author_id: user.id,
        })
        .await
    {
        Ok(agent) => agent,
        Err(e) => return Ok(error_from_hub(&e)),
    };

    // Tell active admins there is something to review
    match storage.list_active_admins().await {
        Ok(admins) => {
            for admin in admins {
                send_detached(
                    notifier.get_ref().clone(),
                    admin.email,
                    "New Agent Submission - AI Agent Hub".to_string(),
                    format!(
                        "<h2>New Agent Submission</h2>\
                         <ul>\
                         <li><strong>Name:</strong> {}</li>\
                         <li><strong>Category:</strong> {}</li>\
                         <li><strong>Author:</strong> {}</li>\
                         </ul>\
                         <p>Please review in the admin panel.</p>",
                        agent.name, agent.category, user.username
                    ),
                );
            }
        }
        Err(e) => warn!("Could not list admins for submission notice: {}", e),
    }

    info!("Agent {} submitted by {}", agent.id, user.username);
    Ok(success_response(AgentResponse::from_parts(
        &agent,
        UserResponse::from_user(&user),
    )))
}

/// GET /agents/{id} - agent detail; records a deduplicated view
pub async fn get_agent(
    path: web::Path<i64>,
    user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let agent_id = path.into_inner();

    let agent = match storage.find_agent(agent_id).await {
        Ok(Some(agent)) => agent,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::AgentNotFound,
                "Agent not found",
            ));
        }
        Err(e) => return Ok(error_from_hub(&e)),
    };

    // Non-admins can see non-approved agents only when they authored them
    if !user.is_admin() && !agent.is_approved() && agent.author_id != user.id {
        return Ok(error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::Forbidden,
            "Not authorized to view this agent",
        ));
    }

    // View tracking never fails the detail fetch
    let mut agent = agent;
    if agent.is_approved() {
        match storage
            .record_view(agent_id, user.id, Duration::minutes(VIEW_DEDUP_WINDOW_MINUTES))
            .await
        {
            Ok(true) => agent.view_count += 1,
            Ok(false) => {}
            Err(e) => warn!("View recording failed for agent {}: {}", agent_id, e),
        }
    }

    let author = match storage.find_user(agent.author_id).await {
        Ok(Some(author)) => author,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::UserNotFound,
                "Agent author not found",
            ));
        }
        Err(e) => return Ok(error_from_hub(&e)),
    };

    Ok(success_response(AgentResponse::from_parts(
        &agent,
        UserResponse::from_user(&author),
    )))
}

/// GET /agents/categories/list - categories with approved-agent counts
pub async fn get_categories(
    _user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let mut categories = Vec::new();
    for category in AgentCategory::iter() {
        let count = match storage.count_approved_in_category(category).await {
            Ok(count) => count,
            Err(e) => return Ok(error_from_hub(&e)),
        };
        categories.push(CategoryResponse {
            value: category,
            label: category.label().to_string(),
            count,
        });
    }

    Ok(success_response(categories))
}

/// GET /agents/my/submissions - caller's own agents, any status
pub async fn my_submissions(
    user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let agents = match storage.list_agents_by_author(user.id).await {
        Ok(agents) => agents,
        Err(e) => return Ok(error_from_hub(&e)),
    };

    let author = UserResponse::from_user(&user);
    let responses: Vec<AgentResponse> = agents
        .iter()
        .map(|agent| AgentResponse::from_parts(agent, author.clone()))
        .collect();

    Ok(success_response(responses))
}
