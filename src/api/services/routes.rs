//! API route configuration
//!
//! Routes are grouped per resource under /api/v1; the whole scope sits
//! behind BearerAuth, and /admin additionally behind AdminGuard.

use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use crate::api::middleware::{AdminGuard, BearerAuth};

use super::admin::{
    approve_user, deactivate_user, list_users, make_admin, pending_agents, pending_users,
    reject_user, review_agent, stats,
};
use super::agents::{create_agent, get_agent, get_agents, get_categories, my_submissions};
use super::auth::{change_password, login, login_rate_limiter, me, refresh, register, verify_otp};
use super::reviews::{
    delete_review, get_reviews, mark_helpful, rate_agent, rating_stats, upsert_review,
};
use super::tracking::{track_click, track_session};
use super::users;

/// Auth routes `/auth`
///
/// - POST /auth/register - create an inactive account (public)
/// - POST /auth/login - issue an OTP (public, rate-limited)
/// - POST /auth/verify-otp - exchange OTP for tokens (public, rate-limited)
/// - POST /auth/refresh - exchange refresh token (public)
/// - GET /auth/me - current profile
/// - POST /auth/change-password
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login).wrap(login_rate_limiter()))
        .route(
            "/verify-otp",
            web::post().to(verify_otp).wrap(login_rate_limiter()),
        )
        .route("/refresh", web::post().to(refresh))
        .route("/me", web::get().to(me))
        .route("/change-password", web::post().to(change_password))
}

/// Agent catalog routes `/agents`
///
/// Fixed paths must precede the `/{id}` wildcards.
pub fn agents_routes() -> actix_web::Scope {
    web::scope("/agents")
        .route("", web::get().to(get_agents))
        .route("", web::post().to(create_agent))
        .route("/categories/list", web::get().to(get_categories))
        .route("/my/submissions", web::get().to(my_submissions))
        .route("/{id}/track-click", web::post().to(track_click))
        .route("/{id}/track-session", web::post().to(track_session))
        .route("/{id}/rate", web::post().to(rate_agent))
        .route("/{id}/rating-stats", web::get().to(rating_stats))
        .route("/{id}/review", web::post().to(upsert_review))
        .route("/{id}/review", web::delete().to(delete_review))
        .route("/{id}/reviews", web::get().to(get_reviews))
        .route(
            "/{id}/reviews/{review_id}/helpful",
            web::post().to(mark_helpful),
        )
        .route("/{id}", web::get().to(get_agent))
}

/// User profile routes `/users`
pub fn users_routes() -> actix_web::Scope {
    web::scope("/users")
        .route("/me", web::get().to(users::me))
        .route("/me/agents", web::get().to(users::my_agents))
        .route("/me/stats", web::get().to(users::my_stats))
        .route("/{id}/agents", web::get().to(users::get_user_agents))
        .route("/{id}", web::get().to(users::get_user))
}

/// Admin routes `/admin` (admin role required)
pub fn admin_routes() -> impl HttpServiceFactory {
    web::scope("/admin")
        .wrap(AdminGuard)
        .route("/pending-agents", web::get().to(pending_agents))
        .route("/agents/{id}/approve", web::patch().to(review_agent))
        .route("/users", web::get().to(list_users))
        .route("/users/pending", web::get().to(pending_users))
        .route("/users/{id}/approve", web::patch().to(approve_user))
        .route("/users/{id}/deactivate", web::patch().to(deactivate_user))
        .route("/users/{id}/make-admin", web::patch().to(make_admin))
        .route("/users/{id}/reject", web::delete().to(reject_user))
        .route("/stats", web::get().to(stats))
}

/// The authenticated /api/v1 scope
pub fn api_v1_routes() -> impl HttpServiceFactory {
    web::scope("/api/v1")
        .wrap(BearerAuth)
        .service(auth_routes())
        .service(agents_routes())
        .service(users_routes())
        .service(admin_routes())
}
