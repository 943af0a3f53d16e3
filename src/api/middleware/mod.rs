mod auth;

pub use auth::{AdminGuard, BearerAuth, CurrentUser};
