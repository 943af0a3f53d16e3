//! Authentication endpoints

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tracing::debug;

use crate::api::middleware::CurrentUser;
use crate::services::AuthService;

use super::helpers::{error_from_hub, success_response, success_with_message};
use super::types::{
    LoginRequest, OtpIssuedResponse, OtpVerifyRequest, PasswordChangeRequest, RefreshRequest,
    RegisterAck, RegisterRequest, TokenResponse, UserResponse,
};

/// Per-IP rate limit key extractor for the login handshake
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let conn_info = req.connection_info();

        // TCP peer address; cannot be spoofed by request headers
        let peer_ip = conn_info
            .peer_addr()
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))?;

        Ok(peer_ip.to_string())
    }
}

/// Login rate limiter: 1 token/s refill, burst of 5
pub fn login_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

/// POST /auth/register - create a new (inactive) account
pub async fn register(
    _req: HttpRequest,
    body: web::Json<RegisterRequest>,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    match auth
        .register(&body.email, &body.username, &body.password)
        .await
    {
        Ok(user) => Ok(success_with_message(
            "Registration successful. Waiting for admin approval.",
            RegisterAck { user_id: user.id },
        )),
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// POST /auth/login - issue an OTP for an active account
pub async fn login(
    _req: HttpRequest,
    body: web::Json<LoginRequest>,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    match auth.initiate_login(&body.username).await {
        Ok(issue) => Ok(success_with_message(
            "OTP sent to your email",
            OtpIssuedResponse {
                otp_code: issue.otp_code,
                expires_in_minutes: issue.expires_in_minutes,
            },
        )),
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// POST /auth/verify-otp - exchange the OTP for a token pair
pub async fn verify_otp(
    _req: HttpRequest,
    body: web::Json<OtpVerifyRequest>,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    match auth.verify_otp(&body.username, &body.otp_code).await {
        Ok((tokens, user)) => Ok(success_with_message(
            "Login successful",
            TokenResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                token_type: "bearer".to_string(),
                user: UserResponse::from_user(&user),
            },
        )),
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// POST /auth/refresh - exchange a refresh token for a new pair
pub async fn refresh(
    _req: HttpRequest,
    body: web::Json<RefreshRequest>,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    match auth.refresh(&body.refresh_token).await {
        Ok((tokens, user)) => Ok(success_with_message(
            "Token refreshed",
            TokenResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                token_type: "bearer".to_string(),
                user: UserResponse::from_user(&user),
            },
        )),
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// GET /auth/me - current user profile
pub async fn me(user: CurrentUser) -> ActixResult<impl Responder> {
    Ok(success_response(UserResponse::from_user(&user)))
}

/// POST /auth/change-password
pub async fn change_password(
    user: CurrentUser,
    body: web::Json<PasswordChangeRequest>,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    match auth
        .change_password(&user, &body.current_password, &body.new_password)
        .await
    {
        Ok(()) => Ok(success_with_message("Password changed successfully", ())),
        Err(e) => Ok(error_from_hub(&e)),
    }
}
