//! Storage layer
//!
//! SeaORM-backed persistence for users, agents, and engagement events,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

pub mod backend;
pub mod models;

pub use backend::HubStorage;
pub use models::{
    Agent, AgentCategory, AgentFilter, AgentStatus, ClickEvent, ClickType, NewAgent, RatingStats,
    Review, SessionEvent, User,
};
