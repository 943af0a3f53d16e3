use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};
use ts_rs::TS;

/// Agent approval status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, TS, EnumIter, AsRefStr,
)]
#[ts(export, export_to = "../web/src/services/types.generated.ts")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for AgentStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!(
                "Invalid agent status: '{}'. Valid: pending, approved, rejected",
                s
            )),
        }
    }
}

/// Fixed agent category set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumIter, AsRefStr)]
#[ts(export, export_to = "../web/src/services/types.generated.ts")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgentCategory {
    Business,
    Healthcare,
    Finance,
    SupplyChain,
    Insurance,
    Hr,
    Operations,
    Engineering,
}

impl AgentCategory {
    /// Human-readable label, e.g. "Supply Chain"
    pub fn label(&self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Healthcare => "Healthcare",
            Self::Finance => "Finance",
            Self::SupplyChain => "Supply Chain",
            Self::Insurance => "Insurance",
            Self::Hr => "HR",
            Self::Operations => "Operations",
            Self::Engineering => "Engineering",
        }
    }
}

impl std::fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for AgentCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(Self::Business),
            "healthcare" => Ok(Self::Healthcare),
            "finance" => Ok(Self::Finance),
            "supply_chain" => Ok(Self::SupplyChain),
            "insurance" => Ok(Self::Insurance),
            "hr" => Ok(Self::Hr),
            "operations" => Ok(Self::Operations),
            "engineering" => Ok(Self::Engineering),
            _ => Err(format!(
                "Invalid category: '{}'. Valid: business, healthcare, finance, supply_chain, insurance, hr, operations, engineering",
                s
            )),
        }
    }
}

/// Click interaction kinds tracked by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumIter, AsRefStr)]
#[ts(export, export_to = "../web/src/services/types.generated.ts")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClickType {
    ModalOpen,
    NewTab,
    ExternalLink,
}

impl std::fmt::Display for ClickType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for ClickType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modal_open" => Ok(Self::ModalOpen),
            "new_tab" => Ok(Self::NewTab),
            "external_link" => Ok(Self::ExternalLink),
            _ => Err(format!(
                "Invalid click type: '{}'. Valid: modal_open, new_tab, external_link",
                s
            )),
        }
    }
}

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub is_active: bool,
    pub otp_code: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub app_url: String,
    pub category: AgentCategory,
    pub status: AgentStatus,
    pub author_id: i64,
    pub approved_by: Option<i64>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    /// Materialized aggregate of agent_views; never drifts from the event log
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    pub fn is_approved(&self) -> bool {
        self.status == AgentStatus::Approved
    }

    pub fn is_pending(&self) -> bool {
        self.status == AgentStatus::Pending
    }
}

/// New agent submission payload (storage-level)
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub name: String,
    pub description: String,
    pub app_url: String,
    pub category: AgentCategory,
    pub author_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickEvent {
    pub id: i64,
    pub agent_id: i64,
    pub user_id: i64,
    pub click_type: ClickType,
    pub referrer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub id: i64,
    pub agent_id: i64,
    pub user_id: i64,
    pub session_start: DateTime<Utc>,
    pub session_end: DateTime<Utc>,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub agent_id: i64,
    pub user_id: i64,
    pub rating: i16,
    pub review_text: String,
    pub helpful_count: i64,
    pub reviewed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate rating statistics computed from agent_ratings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingStats {
    pub average_rating: f64,
    pub rating_count: u64,
    pub review_count: u64,
    /// Histogram indexed by star value 1..=5
    pub distribution: [u64; 5],
}

/// Catalog listing filter
#[derive(Default, Clone, Debug)]
pub struct AgentFilter {
    pub status: Option<AgentStatus>,
    pub category: Option<AgentCategory>,
    /// Case-insensitive substring over name and description
    pub search: Option<String>,
    pub author_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_agent_status_roundtrip() {
        for s in ["pending", "approved", "rejected"] {
            assert_eq!(AgentStatus::from_str(s).unwrap().to_string(), s);
        }
        assert!(AgentStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_category_roundtrip() {
        assert_eq!(
            AgentCategory::from_str("supply_chain").unwrap(),
            AgentCategory::SupplyChain
        );
        assert_eq!(AgentCategory::SupplyChain.to_string(), "supply_chain");
        assert_eq!(AgentCategory::SupplyChain.label(), "Supply Chain");
        assert!(AgentCategory::from_str("gaming").is_err());
    }

    #[test]
    fn test_click_type_parse() {
        assert_eq!(
            ClickType::from_str("modal_open").unwrap(),
            ClickType::ModalOpen
        );
        assert_eq!(ClickType::from_str("new_tab").unwrap(), ClickType::NewTab);
        assert_eq!(
            ClickType::from_str("external_link").unwrap(),
            ClickType::ExternalLink
        );
        assert!(ClickType::from_str("double_click").is_err());
    }

    #[test]
    fn test_user_roles() {
        let mut user = User {
            id: 1,
            email: "a@b.c".into(),
            username: "a".into(),
            password_hash: String::new(),
            roles: vec![ROLE_USER.to_string()],
            is_active: true,
            otp_code: None,
            otp_expires_at: None,
            approved_by: None,
            approved_at: None,
            created_at: Utc::now(),
        };
        assert!(!user.is_admin());
        user.roles.push(ROLE_ADMIN.to_string());
        assert!(user.is_admin());
    }
}
