//! Agent catalog storage operations

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ExprTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::info;

use super::HubStorage;
use super::converters::model_to_agent;
use crate::errors::{AgentHubError, Result};
use crate::storage::models::{Agent, AgentCategory, AgentFilter, AgentStatus, NewAgent};
use migration::entities::agent;

/// Aggregate agent counts for the admin dashboard
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

impl AgentCounts {
    pub fn total(&self) -> u64 {
        self.pending + self.approved + self.rejected
    }
}

fn filter_condition(filter: &AgentFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(status) = filter.status {
        condition = condition.add(agent::Column::Status.eq(status.to_string()));
    }

    if let Some(category) = filter.category {
        condition = condition.add(agent::Column::Category.eq(category.to_string()));
    }

    if let Some(author_id) = filter.author_id {
        condition = condition.add(agent::Column::AuthorId.eq(author_id));
    }

    // Case-insensitive substring over name and description
    if let Some(ref search) = filter.search {
        let pattern = format!("%{}%", search.to_lowercase());
        condition = condition.add(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((agent::Entity, agent::Column::Name))))
                        .like(pattern.as_str()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        agent::Entity,
                        agent::Column::Description,
                    ))))
                    .like(pattern.as_str()),
                ),
        );
    }

    condition
}

impl HubStorage {
    pub async fn insert_agent(&self, new_agent: NewAgent) -> Result<Agent> {
        let model = agent::ActiveModel {
            name: Set(new_agent.name),
            description: Set(new_agent.description),
            app_url: Set(new_agent.app_url),
            category: Set(new_agent.category.to_string()),
            status: Set(AgentStatus::Pending.to_string()),
            author_id: Set(new_agent.author_id),
            approved_by: Set(None),
            approved_at: Set(None),
            rejection_reason: Set(None),
            view_count: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Agent submitted: {} (id {})", model.name, model.id);
        Ok(model_to_agent(model))
    }

    pub async fn find_agent(&self, id: i64) -> Result<Option<Agent>> {
        let model = agent::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_agent))
    }

    /// Filtered catalog listing with total count, newest first
    pub async fn list_agents(
        &self,
        filter: &AgentFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<Agent>, u64)> {
        let condition = filter_condition(filter);

        let total = agent::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await?;

        let models = agent::Entity::find()
            .filter(condition)
            .order_by_desc(agent::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(model_to_agent).collect(), total))
    }

    /// Filtered listing without pagination (profile pages, exports)
    pub async fn list_agents_filtered_all(&self, filter: &AgentFilter) -> Result<Vec<Agent>> {
        let models = agent::Entity::find()
            .filter(filter_condition(filter))
            .order_by_desc(agent::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_agent).collect())
    }

    pub async fn list_agents_by_author(&self, author_id: i64) -> Result<Vec<Agent>> {
        let models = agent::Entity::find()
            .filter(agent::Column::AuthorId.eq(author_id))
            .order_by_desc(agent::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_agent).collect())
    }

    pub async fn list_pending_agents(&self, skip: u64, limit: u64) -> Result<Vec<Agent>> {
        let models = agent::Entity::find()
            .filter(agent::Column::Status.eq(AgentStatus::Pending.to_string()))
            .order_by_desc(agent::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_agent).collect())
    }

    /// Stamp the approval decision on an agent row
    ///
    /// The pending-only state guard lives in the admin service; this method
    /// only persists the transition.
    pub async fn set_agent_review(
        &self,
        agent_id: i64,
        status: AgentStatus,
        reviewed_by: i64,
        rejection_reason: Option<String>,
    ) -> Result<Agent> {
        let Some(model) = agent::Entity::find_by_id(agent_id).one(&self.db).await? else {
            return Err(AgentHubError::not_found(format!(
                "Agent not found: {}",
                agent_id
            )));
        };

        let mut am: agent::ActiveModel = model.into();
        am.status = Set(status.to_string());
        am.approved_by = Set(Some(reviewed_by));
        am.approved_at = Set(Some(Utc::now()));
        am.rejection_reason = Set(rejection_reason);
        let updated = am.update(&self.db).await?;

        info!("Agent {} marked {} by {}", agent_id, status, reviewed_by);
        Ok(model_to_agent(updated))
    }

    pub async fn count_agents_by_status(&self) -> Result<AgentCounts> {
        let count_for = |status: AgentStatus| {
            agent::Entity::find()
                .filter(agent::Column::Status.eq(status.to_string()))
                .count(&self.db)
        };

        Ok(AgentCounts {
            pending: count_for(AgentStatus::Pending).await?,
            approved: count_for(AgentStatus::Approved).await?,
            rejected: count_for(AgentStatus::Rejected).await?,
        })
    }

    pub async fn count_agents_since(&self, since: DateTime<Utc>) -> Result<u64> {
        let count = agent::Entity::find()
            .filter(agent::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// Approved-agent count for one category
    pub async fn count_approved_in_category(&self, category: AgentCategory) -> Result<u64> {
        let count = agent::Entity::find()
            .filter(agent::Column::Category.eq(category.to_string()))
            .filter(agent::Column::Status.eq(AgentStatus::Approved.to_string()))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
