use actix_web::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone)]
pub enum AgentHubError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    NotFound(String),
    Authentication(String),
    Forbidden(String),
    Conflict(String),
    Serialization(String),
    Notify(String),
}

impl AgentHubError {
    /// Stable error code for logs and CLI output
    pub fn code(&self) -> &'static str {
        match self {
            AgentHubError::DatabaseConfig(_) => "E001",
            AgentHubError::DatabaseConnection(_) => "E002",
            AgentHubError::DatabaseOperation(_) => "E003",
            AgentHubError::Validation(_) => "E004",
            AgentHubError::NotFound(_) => "E005",
            AgentHubError::Authentication(_) => "E006",
            AgentHubError::Forbidden(_) => "E007",
            AgentHubError::Conflict(_) => "E008",
            AgentHubError::Serialization(_) => "E009",
            AgentHubError::Notify(_) => "E010",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AgentHubError::DatabaseConfig(_) => "Database Configuration Error",
            AgentHubError::DatabaseConnection(_) => "Database Connection Error",
            AgentHubError::DatabaseOperation(_) => "Database Operation Error",
            AgentHubError::Validation(_) => "Validation Error",
            AgentHubError::NotFound(_) => "Resource Not Found",
            AgentHubError::Authentication(_) => "Authentication Error",
            AgentHubError::Forbidden(_) => "Forbidden",
            AgentHubError::Conflict(_) => "Conflict",
            AgentHubError::Serialization(_) => "Serialization Error",
            AgentHubError::Notify(_) => "Notification Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AgentHubError::DatabaseConfig(msg)
            | AgentHubError::DatabaseConnection(msg)
            | AgentHubError::DatabaseOperation(msg)
            | AgentHubError::Validation(msg)
            | AgentHubError::NotFound(msg)
            | AgentHubError::Authentication(msg)
            | AgentHubError::Forbidden(msg)
            | AgentHubError::Conflict(msg)
            | AgentHubError::Serialization(msg)
            | AgentHubError::Notify(msg) => msg,
        }
    }

    /// HTTP status this error maps to at the API boundary
    pub fn http_status(&self) -> StatusCode {
        match self {
            AgentHubError::Validation(_) => StatusCode::BAD_REQUEST,
            AgentHubError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AgentHubError::Forbidden(_) => StatusCode::FORBIDDEN,
            AgentHubError::NotFound(_) => StatusCode::NOT_FOUND,
            AgentHubError::Conflict(_) => StatusCode::CONFLICT,
            AgentHubError::DatabaseConfig(_)
            | AgentHubError::DatabaseConnection(_)
            | AgentHubError::DatabaseOperation(_)
            | AgentHubError::Serialization(_)
            | AgentHubError::Notify(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// Colored output for CLI mode
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }
}

impl fmt::Display for AgentHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AgentHubError {}

impl AgentHubError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AgentHubError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AgentHubError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        AgentHubError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AgentHubError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AgentHubError::NotFound(msg.into())
    }

    pub fn authentication<T: Into<String>>(msg: T) -> Self {
        AgentHubError::Authentication(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        AgentHubError::Forbidden(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        AgentHubError::Conflict(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AgentHubError::Serialization(msg.into())
    }

    pub fn notify<T: Into<String>>(msg: T) -> Self {
        AgentHubError::Notify(msg.into())
    }
}

impl From<sea_orm::DbErr> for AgentHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        AgentHubError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AgentHubError {
    fn from(err: serde_json::Error) -> Self {
        AgentHubError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgentHubError>;
