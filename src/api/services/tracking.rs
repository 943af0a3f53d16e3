//! Engagement tracking endpoints
//!
//! Clients fire these without blocking the UI; responses are small acks.
//! Validation failures are real 4xx errors, but the client swallows them.

use actix_web::http::StatusCode;
use actix_web::{Responder, Result as ActixResult, web};
use std::str::FromStr;
use std::sync::Arc;

use crate::api::constants::SESSION_MIN_DURATION_SECONDS;
use crate::api::middleware::CurrentUser;
use crate::storage::{ClickType, HubStorage};

use super::error_code::ErrorCode;
use super::helpers::{error_from_hub, error_response, success_with_message};
use super::types::{ClickAck, SessionAck, TrackClickRequest, TrackSessionRequest};

/// POST /agents/{id}/track-click
pub async fn track_click(
    path: web::Path<i64>,
    body: web::Json<TrackClickRequest>,
    user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let agent_id = path.into_inner();

    match storage.find_agent(agent_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::AgentNotFound,
                "Agent not found",
            ));
        }
        Err(e) => return Ok(error_from_hub(&e)),
    }

    let click_type = match ClickType::from_str(&body.click_type) {
        Ok(click_type) => click_type,
        Err(e) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidClickType,
                &e,
            ));
        }
    };

    match storage
        .insert_click(agent_id, user.id, click_type, body.referrer.clone())
        .await
    {
        Ok(_) => Ok(success_with_message(
            "Click tracked successfully",
            ClickAck {
                agent_id,
                click_type: click_type.to_string(),
            },
        )),
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// POST /agents/{id}/track-session
///
/// Sessions at or below the noise threshold are acknowledged but not
/// persisted; that silent no-op is the contract, not an error.
pub async fn track_session(
    path: web::Path<i64>,
    body: web::Json<TrackSessionRequest>,
    user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let agent_id = path.into_inner();
    let duration = body.duration_seconds;

    match storage.find_agent(agent_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::AgentNotFound,
                "Agent not found",
            ));
        }
        Err(e) => return Ok(error_from_hub(&e)),
    }

    if !duration.is_finite() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidDuration,
            "Duration must be a finite number",
        ));
    }

    if duration <= SESSION_MIN_DURATION_SECONDS {
        return Ok(success_with_message(
            "Session discarded as noise",
            SessionAck {
                agent_id,
                duration_seconds: duration,
                accepted: false,
            },
        ));
    }

    match storage.insert_session(agent_id, user.id, duration).await {
        Ok(_) => Ok(success_with_message(
            "Session tracked successfully",
            SessionAck {
                agent_id,
                duration_seconds: duration,
                accepted: true,
            },
        )),
        Err(e) => Ok(error_from_hub(&e)),
    }
}
