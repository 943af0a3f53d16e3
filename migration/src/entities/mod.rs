//! SeaORM entities for the agenthub schema

pub mod agent;
pub mod agent_click;
pub mod agent_rating;
pub mod agent_review;
pub mod agent_session;
pub mod agent_view;
pub mod user;
