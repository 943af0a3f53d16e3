//! HTTP services: handlers, DTOs, error codes, and route configuration

pub mod admin;
pub mod agents;
pub mod auth;
mod error_code;
pub mod health;
mod helpers;
pub mod reviews;
mod routes;
pub mod tracking;
mod types;
pub mod users;

pub use error_code::ErrorCode;
pub use helpers::{
    api_result, error_from_hub, error_response, json_response, success_response,
    success_with_message,
};
pub use routes::{admin_routes, agents_routes, api_v1_routes, auth_routes, users_routes};
pub use types::*;
