//! Health check endpoint

use actix_web::{Responder, Result as ActixResult};

use super::helpers::success_response;
use super::types::HealthResponse;

/// GET /health - liveness probe, unauthenticated
pub async fn health_check() -> ActixResult<impl Responder> {
    Ok(success_response(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
