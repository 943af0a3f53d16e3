//! Rating and review storage operations
//!
//! Ratings are one row per (agent, user), written with an atomic
//! ON CONFLICT upsert. Reviews share the same uniqueness rule; a review
//! write also carries its rating through to agent_ratings in the same
//! transaction, so stats computed from agent_ratings include review-only
//! raters.

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ExprTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::{debug, info};

use super::HubStorage;
use super::converters::model_to_review;
use crate::errors::{AgentHubError, Result};
use crate::storage::models::{RatingStats, Review};
use migration::entities::{agent_rating, agent_review};

/// ON CONFLICT (agent_id, user_id) upsert of a rating row
async fn upsert_rating_on<C: ConnectionTrait>(
    conn: &C,
    agent_id: i64,
    user_id: i64,
    rating: i16,
) -> std::result::Result<(), sea_orm::DbErr> {
    let active_model = agent_rating::ActiveModel {
        agent_id: Set(agent_id),
        user_id: Set(user_id),
        rating: Set(rating),
        rated_at: Set(Utc::now()),
        ..Default::default()
    };

    agent_rating::Entity::insert(active_model)
        .on_conflict(
            OnConflict::columns([
                agent_rating::Column::AgentId,
                agent_rating::Column::UserId,
            ])
            .update_columns([agent_rating::Column::Rating, agent_rating::Column::RatedAt])
            .to_owned(),
        )
        .exec(conn)
        .await?;

    Ok(())
}

impl HubStorage {
    /// Upsert the bare star rating for (agent, user)
    pub async fn upsert_rating(&self, agent_id: i64, user_id: i64, rating: i16) -> Result<()> {
        upsert_rating_on(&self.db, agent_id, user_id, rating)
            .await
            .map_err(|e| {
                AgentHubError::database_operation(format!(
                    "Upsert rating for agent {} failed: {}",
                    agent_id, e
                ))
            })?;

        debug!(
            "Rating upserted: agent {} user {} value {}",
            agent_id, user_id, rating
        );
        Ok(())
    }

    /// Aggregate stats over agent_ratings, plus the review count
    pub async fn rating_stats(&self, agent_id: i64) -> Result<RatingStats> {
        let values: Vec<i16> = agent_rating::Entity::find()
            .select_only()
            .column(agent_rating::Column::Rating)
            .filter(agent_rating::Column::AgentId.eq(agent_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        let review_count = agent_review::Entity::find()
            .filter(agent_review::Column::AgentId.eq(agent_id))
            .count(&self.db)
            .await?;

        let mut distribution = [0u64; 5];
        for value in &values {
            if (1..=5).contains(value) {
                distribution[(value - 1) as usize] += 1;
            }
        }

        let average_rating = if values.is_empty() {
            0.0
        } else {
            let sum: i64 = values.iter().map(|v| *v as i64).sum();
            let mean = sum as f64 / values.len() as f64;
            (mean * 100.0).round() / 100.0
        };

        Ok(RatingStats {
            average_rating,
            rating_count: values.len() as u64,
            review_count,
            distribution,
        })
    }

    pub async fn find_review(&self, agent_id: i64, user_id: i64) -> Result<Option<Review>> {
        let model = agent_review::Entity::find()
            .filter(agent_review::Column::AgentId.eq(agent_id))
            .filter(agent_review::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_review))
    }

    pub async fn find_review_by_id(&self, agent_id: i64, review_id: i64) -> Result<Option<Review>> {
        let model = agent_review::Entity::find_by_id(review_id)
            .filter(agent_review::Column::AgentId.eq(agent_id))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_review))
    }

    /// Create or update the (agent, user) review, writing the rating through
    /// to agent_ratings in the same transaction
    pub async fn upsert_review(
        &self,
        agent_id: i64,
        user_id: i64,
        rating: i16,
        review_text: &str,
    ) -> Result<Review> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        let existing = agent_review::Entity::find()
            .filter(agent_review::Column::AgentId.eq(agent_id))
            .filter(agent_review::Column::UserId.eq(user_id))
            .one(&txn)
            .await?;

        let model = match existing {
            Some(model) => {
                let mut am: agent_review::ActiveModel = model.into();
                am.rating = Set(rating);
                am.review_text = Set(review_text.to_string());
                am.updated_at = Set(now);
                am.update(&txn).await?
            }
            None => {
                agent_review::ActiveModel {
                    agent_id: Set(agent_id),
                    user_id: Set(user_id),
                    rating: Set(rating),
                    review_text: Set(review_text.to_string()),
                    helpful_count: Set(0),
                    reviewed_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        upsert_rating_on(&txn, agent_id, user_id, rating).await?;

        txn.commit().await?;
        info!("Review upserted: agent {} user {}", agent_id, user_id);
        Ok(model_to_review(model))
    }

    /// Reviews for an agent, newest first
    pub async fn list_reviews(
        &self,
        agent_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Review>> {
        let models = agent_review::Entity::find()
            .filter(agent_review::Column::AgentId.eq(agent_id))
            .order_by_desc(agent_review::Column::ReviewedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_review).collect())
    }

    /// Delete the caller's own review; the bare rating row is untouched
    pub async fn delete_review(&self, agent_id: i64, user_id: i64) -> Result<()> {
        let result = agent_review::Entity::delete_many()
            .filter(agent_review::Column::AgentId.eq(agent_id))
            .filter(agent_review::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AgentHubError::not_found("Review not found".to_string()));
        }

        info!("Review deleted: agent {} user {}", agent_id, user_id);
        Ok(())
    }

    /// Increment helpful_count and return the new value
    pub async fn increment_helpful(&self, agent_id: i64, review_id: i64) -> Result<i64> {
        let result = agent_review::Entity::update_many()
            .col_expr(
                agent_review::Column::HelpfulCount,
                Expr::col(agent_review::Column::HelpfulCount).add(1),
            )
            .filter(agent_review::Column::Id.eq(review_id))
            .filter(agent_review::Column::AgentId.eq(agent_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AgentHubError::not_found("Review not found".to_string()));
        }

        let model = agent_review::Entity::find_by_id(review_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AgentHubError::not_found("Review not found".to_string()))?;

        Ok(model.helpful_count)
    }
}
