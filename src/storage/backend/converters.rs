use std::str::FromStr;

use tracing::warn;

use crate::storage::models::{
    Agent, AgentCategory, AgentStatus, ClickEvent, ClickType, Review, SessionEvent, User,
};
use migration::entities::{agent, agent_click, agent_review, agent_session, user};

/// Decode the JSON-encoded role list stored on the user row
pub fn decode_roles(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(roles) => roles,
        Err(e) => {
            warn!("Malformed roles column '{}': {}; defaulting to [user]", raw, e);
            vec![crate::storage::models::ROLE_USER.to_string()]
        }
    }
}

/// Encode a role list for storage
pub fn encode_roles(roles: &[String]) -> String {
    serde_json::to_string(roles).unwrap_or_else(|_| "[\"user\"]".to_string())
}

pub fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        password_hash: model.password_hash,
        roles: decode_roles(&model.roles),
        is_active: model.is_active,
        otp_code: model.otp_code,
        otp_expires_at: model.otp_expires_at,
        approved_by: model.approved_by,
        approved_at: model.approved_at,
        created_at: model.created_at,
    }
}

pub fn model_to_agent(model: agent::Model) -> Agent {
    let status = AgentStatus::from_str(&model.status).unwrap_or_else(|e| {
        warn!("Agent {} has malformed status: {}", model.id, e);
        AgentStatus::Pending
    });
    let category = AgentCategory::from_str(&model.category).unwrap_or_else(|e| {
        warn!("Agent {} has malformed category: {}", model.id, e);
        AgentCategory::Business
    });

    Agent {
        id: model.id,
        name: model.name,
        description: model.description,
        app_url: model.app_url,
        category,
        status,
        author_id: model.author_id,
        approved_by: model.approved_by,
        approved_at: model.approved_at,
        rejection_reason: model.rejection_reason,
        view_count: model.view_count.max(0),
        created_at: model.created_at,
    }
}

pub fn model_to_click(model: agent_click::Model) -> ClickEvent {
    let click_type = ClickType::from_str(&model.click_type).unwrap_or_else(|e| {
        warn!("Click {} has malformed click_type: {}", model.id, e);
        ClickType::ModalOpen
    });

    ClickEvent {
        id: model.id,
        agent_id: model.agent_id,
        user_id: model.user_id,
        click_type,
        referrer: model.referrer,
        clicked_at: model.clicked_at,
    }
}

pub fn model_to_session(model: agent_session::Model) -> SessionEvent {
    SessionEvent {
        id: model.id,
        agent_id: model.agent_id,
        user_id: model.user_id,
        session_start: model.session_start,
        session_end: model.session_end,
        duration_seconds: model.duration_seconds,
    }
}

pub fn model_to_review(model: agent_review::Model) -> Review {
    Review {
        id: model.id,
        agent_id: model.agent_id,
        user_id: model.user_id,
        rating: model.rating,
        review_text: model.review_text,
        helpful_count: model.helpful_count.max(0),
        reviewed_at: model.reviewed_at,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_decode_roles_valid() {
        assert_eq!(decode_roles("[\"user\",\"admin\"]"), vec!["user", "admin"]);
    }

    #[test]
    fn test_decode_roles_malformed_defaults_to_user() {
        assert_eq!(decode_roles("not json"), vec!["user"]);
        assert_eq!(decode_roles("{\"a\":1}"), vec!["user"]);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let roles = vec!["user".to_string(), "admin".to_string()];
        assert_eq!(decode_roles(&encode_roles(&roles)), roles);
    }

    #[test]
    fn test_model_to_agent_malformed_status_falls_back() {
        let model = agent::Model {
            id: 1,
            name: "Test".into(),
            description: "desc".into(),
            app_url: "https://example.com".into(),
            category: "business".into(),
            status: "bogus".into(),
            author_id: 1,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            view_count: -3,
            created_at: Utc::now(),
        };
        let agent = model_to_agent(model);
        assert_eq!(agent.status, AgentStatus::Pending);
        assert_eq!(agent.view_count, 0);
    }
}
