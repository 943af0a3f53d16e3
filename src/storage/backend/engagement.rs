//! Engagement event storage operations
//!
//! Views are deduplicated per (agent, user) inside a rolling window; the
//! probe and the insert run inside a single transaction so the denormalized
//! `agents.view_count` never drifts from the event log. Clicks are appended
//! as-is; sessions arrive pre-validated from the service layer.

use chrono::{DateTime, Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ExprTrait, PaginatorTrait, QueryFilter,
    TransactionTrait,
};
use tracing::debug;

use super::HubStorage;
use super::converters::{model_to_click, model_to_session};
use crate::errors::Result;
use crate::storage::models::{ClickEvent, ClickType, SessionEvent};
use migration::entities::{agent, agent_click, agent_session, agent_view};

impl HubStorage {
    /// Record a view unless the same (agent, user) pair already has one
    /// inside the dedup window. Returns whether a new view was counted.
    ///
    /// The staleness probe, the event insert, and the counter increment run
    /// in one transaction. Two requests racing the window can still both
    /// pass the probe under weak isolation; that double-count is accepted
    /// and both writes stay consistent with the counter.
    pub async fn record_view(
        &self,
        agent_id: i64,
        user_id: i64,
        window: Duration,
    ) -> Result<bool> {
        let txn = self.db.begin().await?;
        let now = Utc::now();
        let cutoff = now - window;

        let recent = agent_view::Entity::find()
            .filter(agent_view::Column::AgentId.eq(agent_id))
            .filter(agent_view::Column::UserId.eq(user_id))
            .filter(agent_view::Column::ViewedAt.gte(cutoff))
            .one(&txn)
            .await?;

        if recent.is_some() {
            txn.commit().await?;
            debug!(
                "View suppressed for agent {} by user {} (inside dedup window)",
                agent_id, user_id
            );
            return Ok(false);
        }

        agent_view::ActiveModel {
            agent_id: Set(agent_id),
            user_id: Set(user_id),
            viewed_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        agent::Entity::update_many()
            .col_expr(
                agent::Column::ViewCount,
                Expr::col(agent::Column::ViewCount).add(1),
            )
            .filter(agent::Column::Id.eq(agent_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        debug!("View recorded for agent {} by user {}", agent_id, user_id);
        Ok(true)
    }

    /// Event-log view count for one agent (source of truth for the
    /// denormalized counter)
    pub async fn count_view_events(&self, agent_id: i64) -> Result<u64> {
        let count = agent_view::Entity::find()
            .filter(agent_view::Column::AgentId.eq(agent_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    pub async fn count_all_views(&self) -> Result<u64> {
        let count = agent_view::Entity::find().count(&self.db).await?;
        Ok(count)
    }

    pub async fn count_views_since(&self, since: DateTime<Utc>) -> Result<u64> {
        let count = agent_view::Entity::find()
            .filter(agent_view::Column::ViewedAt.gte(since))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// Append a click event; clicks are never deduplicated
    pub async fn insert_click(
        &self,
        agent_id: i64,
        user_id: i64,
        click_type: ClickType,
        referrer: Option<String>,
    ) -> Result<ClickEvent> {
        let model = agent_click::ActiveModel {
            agent_id: Set(agent_id),
            user_id: Set(user_id),
            click_type: Set(click_type.to_string()),
            referrer: Set(referrer),
            clicked_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!(
            "Click recorded for agent {} by user {} ({})",
            agent_id, user_id, click_type
        );
        Ok(model_to_click(model))
    }

    pub async fn count_clicks(&self, agent_id: i64) -> Result<u64> {
        let count = agent_click::Entity::find()
            .filter(agent_click::Column::AgentId.eq(agent_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// Persist a session; session_start is back-computed from the duration
    pub async fn insert_session(
        &self,
        agent_id: i64,
        user_id: i64,
        duration_seconds: f64,
    ) -> Result<SessionEvent> {
        let session_end = Utc::now();
        let millis = (duration_seconds * 1000.0).round() as i64;
        let session_start = session_end - Duration::milliseconds(millis);

        let model = agent_session::ActiveModel {
            agent_id: Set(agent_id),
            user_id: Set(user_id),
            session_start: Set(session_start),
            session_end: Set(session_end),
            duration_seconds: Set(duration_seconds),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!(
            "Session recorded for agent {} by user {} ({:.1}s)",
            agent_id, user_id, duration_seconds
        );
        Ok(model_to_session(model))
    }

    pub async fn count_sessions(&self, agent_id: i64) -> Result<u64> {
        let count = agent_session::Entity::find()
            .filter(agent_session::Column::AgentId.eq(agent_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
