use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{info, trace};

use crate::api::jwt::get_jwt_service;
use crate::api::services::{ApiResponse, ErrorCode};
use crate::storage::{HubStorage, User};

/// Authenticated user injected into request extensions by `BearerAuth`
#[derive(Clone)]
pub struct CurrentUser(pub User);

impl std::ops::Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError("authentication context missing")
                }),
        )
    }
}

/// Paths under the protected scope that skip bearer authentication
const PUBLIC_PATHS: [&str; 4] = [
    "/api/v1/auth/register",
    "/api/v1/auth/login",
    "/api/v1/auth/verify-otp",
    "/api/v1/auth/refresh",
];

/// Bearer-token authentication middleware for the /api/v1 scope
///
/// Validates the access token, loads the user behind `sub`, requires an
/// active account, and injects `CurrentUser` into request extensions.
#[derive(Clone)]
pub struct BearerAuth;

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    fn unauthorized(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
        info!("Authentication failed: {}", message);
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: format!("Unauthorized: {}", message),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// Extract the Bearer token from the Authorization header
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_string())
    }

    fn is_public_path(req: &ServiceRequest) -> bool {
        PUBLIC_PATHS.contains(&req.path())
    }
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            // Handle CORS preflight requests
            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            // Registration and the login handshake run unauthenticated
            if Self::is_public_path(&req) {
                trace!("Public endpoint accessed - bypassing authentication");
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            let Some(token) = Self::extract_bearer_token(&req) else {
                return Ok(Self::unauthorized(req, "missing bearer token"));
            };

            let claims = match get_jwt_service().validate_access_token(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    return Ok(Self::unauthorized(req, &format!("invalid token: {}", e)));
                }
            };

            let Some(storage) = req
                .app_data::<web::Data<Arc<HubStorage>>>()
                .map(|data| data.get_ref().clone())
            else {
                return Ok(Self::unauthorized(req, "storage unavailable"));
            };

            let user = match storage.find_user_by_username(&claims.sub).await {
                Ok(Some(user)) => user,
                Ok(None) => return Ok(Self::unauthorized(req, "unknown user")),
                Err(e) => {
                    return Ok(Self::unauthorized(req, &format!("user lookup failed: {}", e)));
                }
            };

            if !user.is_active {
                return Ok(Self::unauthorized(req, "account is deactivated"));
            }

            trace!("Authenticated request for {}", user.username);
            req.extensions_mut().insert(CurrentUser(user));
            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}

/// Admin-role guard for the /admin scope
///
/// Runs inside `BearerAuth`, so `CurrentUser` is already present; rejects
/// callers without the admin role.
#[derive(Clone)]
pub struct AdminGuard;

impl<S, B> Transform<S, ServiceRequest> for AdminGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGuardMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AdminGuardMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            let is_admin = req
                .extensions()
                .get::<CurrentUser>()
                .map(|user| user.is_admin())
                .unwrap_or(false);

            if !is_admin {
                info!("Admin route rejected for non-admin caller");
                return Ok(req.into_response(
                    HttpResponse::Forbidden()
                        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                        .json(ApiResponse::<()> {
                            code: ErrorCode::Forbidden as i32,
                            message: "Forbidden: admin role required".to_string(),
                            data: None,
                        })
                        .map_into_right_body(),
                ));
            }

            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}
