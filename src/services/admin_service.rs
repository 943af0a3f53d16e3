//! Admin workflow service
//!
//! Agent and user approval state machines plus the dashboard aggregates.
//! Terminal states are terminal: a reviewed agent cannot be re-reviewed, an
//! active user cannot be re-approved.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::info;
use ts_rs::TS;

use crate::errors::{AgentHubError, Result};
use crate::services::notify::{Notifier, send_detached};
use crate::storage::models::ROLE_ADMIN;
use crate::storage::{Agent, AgentStatus, HubStorage, User};

const TS_EXPORT_PATH: &str = "../web/src/services/types.generated.ts";

/// Dashboard statistics
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AdminStats {
    pub agents: AgentStatsBlock,
    pub users: UserStatsBlock,
    pub engagement: EngagementStatsBlock,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AgentStatsBlock {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    /// Submissions in the last 7 days
    pub recent: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UserStatsBlock {
    pub total: u64,
    pub active: u64,
    pub pending: u64,
    pub admins: u64,
    pub recent: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct EngagementStatsBlock {
    pub total_views: u64,
    pub recent_views: u64,
}

pub struct AdminService {
    storage: Arc<HubStorage>,
    notifier: Arc<dyn Notifier>,
}

impl AdminService {
    pub fn new(storage: Arc<HubStorage>, notifier: Arc<dyn Notifier>) -> Self {
        Self { storage, notifier }
    }

    /// Approve or reject a pending agent submission
    pub async fn review_agent(
        &self,
        agent_id: i64,
        admin: &User,
        approve: bool,
        rejection_reason: Option<String>,
    ) -> Result<Agent> {
        let agent = self
            .storage
            .find_agent(agent_id)
            .await?
            .ok_or_else(|| AgentHubError::not_found("Agent not found"))?;

        if !agent.is_pending() {
            return Err(AgentHubError::validation("Agent has already been reviewed"));
        }

        let status = if approve {
            AgentStatus::Approved
        } else {
            AgentStatus::Rejected
        };
        let reason = if approve { None } else { rejection_reason };

        let updated = self
            .storage
            .set_agent_review(agent_id, status, admin.id, reason.clone())
            .await?;

        if let Some(author) = self.storage.find_user(updated.author_id).await? {
            let body = match (&status, &reason) {
                (AgentStatus::Approved, _) => format!(
                    "<h2>Submission Approved</h2>\
                     <p>Hello {}, your agent <strong>{}</strong> is now live in the catalog.</p>",
                    author.username, updated.name
                ),
                (_, Some(reason)) => format!(
                    "<h2>Submission Rejected</h2>\
                     <p>Hello {}, your agent <strong>{}</strong> was rejected: {}</p>",
                    author.username, updated.name, reason
                ),
                _ => format!(
                    "<h2>Submission Rejected</h2>\
                     <p>Hello {}, your agent <strong>{}</strong> was rejected.</p>",
                    author.username, updated.name
                ),
            };
            send_detached(
                self.notifier.clone(),
                author.email,
                format!("Agent {} - AI Agent Hub", status),
                body,
            );
        }

        info!(
            "Agent {} {} by admin {}",
            agent_id, updated.status, admin.username
        );
        Ok(updated)
    }

    /// Activate a pending user registration
    pub async fn approve_user(&self, user_id: i64, admin: &User) -> Result<User> {
        let user = self
            .storage
            .find_user(user_id)
            .await?
            .ok_or_else(|| AgentHubError::not_found("User not found"))?;

        if user.is_active {
            return Err(AgentHubError::validation("User is already active"));
        }

        let activated = self.storage.activate_user(user_id, admin.id).await?;

        send_detached(
            self.notifier.clone(),
            activated.email.clone(),
            "Account Approved - AI Agent Hub".to_string(),
            format!(
                "<h2>Welcome!</h2>\
                 <p>Hello {}, your account has been approved. You can now log in.</p>",
                activated.username
            ),
        );

        Ok(activated)
    }

    pub async fn deactivate_user(&self, user_id: i64, admin: &User) -> Result<User> {
        let user = self
            .storage
            .find_user(user_id)
            .await?
            .ok_or_else(|| AgentHubError::not_found("User not found"))?;

        if user.id == admin.id {
            return Err(AgentHubError::validation(
                "Cannot deactivate your own account",
            ));
        }

        if !user.is_active {
            return Err(AgentHubError::validation("User is already inactive"));
        }

        self.storage.deactivate_user(user_id).await
    }

    /// Reject (hard-delete) a pending registration
    pub async fn reject_user(&self, user_id: i64, admin: &User) -> Result<()> {
        let user = self
            .storage
            .find_user(user_id)
            .await?
            .ok_or_else(|| AgentHubError::not_found("User not found"))?;

        if user.is_active {
            return Err(AgentHubError::validation("Cannot reject an active user"));
        }

        if user.id == admin.id {
            return Err(AgentHubError::validation("Cannot reject your own account"));
        }

        self.storage.delete_user(user_id).await
    }

    /// Grant the admin role to an active user
    pub async fn make_admin(&self, user_id: i64) -> Result<User> {
        let user = self
            .storage
            .find_user(user_id)
            .await?
            .ok_or_else(|| AgentHubError::not_found("User not found"))?;

        if !user.is_active {
            return Err(AgentHubError::validation(
                "Cannot grant admin role to inactive user",
            ));
        }

        if user.is_admin() {
            return Err(AgentHubError::validation("User is already an admin"));
        }

        let mut roles = user.roles.clone();
        roles.push(ROLE_ADMIN.to_string());
        roles.dedup();

        self.storage.set_user_roles(user_id, &roles).await
    }

    pub async fn dashboard_stats(&self) -> Result<AdminStats> {
        let week_ago = Utc::now() - Duration::days(7);

        let agent_counts = self.storage.count_agents_by_status().await?;
        let user_counts = self.storage.user_counts().await?;

        Ok(AdminStats {
            agents: AgentStatsBlock {
                total: agent_counts.total(),
                pending: agent_counts.pending,
                approved: agent_counts.approved,
                rejected: agent_counts.rejected,
                recent: self.storage.count_agents_since(week_ago).await?,
            },
            users: UserStatsBlock {
                total: user_counts.total,
                active: user_counts.active,
                pending: user_counts.pending,
                admins: user_counts.admins,
                recent: self.storage.count_users_since(week_ago).await?,
            },
            engagement: EngagementStatsBlock {
                total_views: self.storage.count_all_views().await?,
                recent_views: self.storage.count_views_since(week_ago).await?,
            },
        })
    }
}
