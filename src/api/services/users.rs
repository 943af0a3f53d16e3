//! User profile endpoints

use actix_web::http::StatusCode;
use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;

use crate::api::middleware::CurrentUser;
use crate::storage::{AgentFilter, AgentStatus, HubStorage};

use super::agents::agents_with_authors;
use super::error_code::ErrorCode;
use super::helpers::{error_from_hub, error_response, success_response};
use super::types::{
    AgentResponse, MyAgentCounts, MyEngagement, MyProfile, MyStatsResponse, PopularAgent,
    UserResponse,
};

/// GET /users/me
pub async fn me(user: CurrentUser) -> ActixResult<impl Responder> {
    Ok(success_response(UserResponse::from_user(&user)))
}

/// GET /users/me/agents
pub async fn my_agents(
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

/// GET /users/me/stats - the caller's submission and engagement summary
pub async fn my_stats(
    user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let agents = match storage.list_agents_by_author(user.id).await {
        Ok(agents) => agents,
        Err(e) => return Ok(error_from_hub(&e)),
    };

    let mut counts = MyAgentCounts {
        total: agents.len() as u64,
        pending: 0,
        approved: 0,
        rejected: 0,
    };
    for agent in &agents {
        match agent.status {
            AgentStatus::Pending => counts.pending += 1,
            AgentStatus::Approved => counts.approved += 1,
            AgentStatus::Rejected => counts.rejected += 1,
        }
    }

    let total_views: u64 = agents.iter().map(|a| a.view_count.max(0) as u64).sum();
    let most_popular_agent = agents
        .iter()
        .filter(|a| a.view_count > 0)
        .max_by_key(|a| a.view_count)
        .map(|a| PopularAgent {
            id: a.id,
            name: a.name.clone(),
            views: a.view_count as u64,
        });

    Ok(success_response(MyStatsResponse {
        agents: counts,
        engagement: MyEngagement {
            total_views,
            most_popular_agent,
        },
        profile: MyProfile {
            member_since: user.created_at,
            roles: user.roles.clone(),
            is_admin: user.is_admin(),
        },
    }))
}

/// GET /users/{id} - public profile; email hidden from non-admins
pub async fn get_user(
    path: web::Path<i64>,
    current: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();

    let user = match storage.find_user(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::UserNotFound,
                "User not found",
            ));
        }
        Err(e) => return Ok(error_from_hub(&e)),
    };

    let response = if current.is_admin() {
        UserResponse::from_user(&user)
    } else {
        UserResponse::masked(&user)
    };

    Ok(success_response(response))
}

/// GET /users/{id}/agents - approved agents only, unless self or admin
pub async fn get_user_agents(
    path: web::Path<i64>,
    current: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();

    match storage.find_user(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::UserNotFound,
                "User not found",
            ));
        }
        Err(e) => return Ok(error_from_hub(&e)),
    }

    let agents = if current.id == user_id || current.is_admin() {
        storage.list_agents_by_author(user_id).await
    } else {
        let filter = AgentFilter {
            status: Some(AgentStatus::Approved),
            author_id: Some(user_id),
            ..Default::default()
        };
        storage.list_agents_filtered_all(&filter).await
    };

    let agents = match agents {
        Ok(agents) => agents,
        Err(e) => return Ok(error_from_hub(&e)),
    };

    let mut responses = match agents_with_authors(&storage, agents).await {
        Ok(responses) => responses,
        Err(e) => return Ok(error_from_hub(&e)),
    };

    if !current.is_admin() && current.id != user_id {
        for agent in &mut responses {
            agent.author.email = "***@***.***".to_string();
        }
    }

    Ok(success_response(responses))
}
