//! User account storage operations

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::info;

use super::HubStorage;
use super::converters::{encode_roles, model_to_user};
use crate::errors::{AgentHubError, Result};
use crate::storage::models::{ROLE_ADMIN, User};
use migration::entities::user;

/// Aggregate user counts for the admin dashboard
#[derive(Debug, Clone, Copy, Default)]
pub struct UserCounts {
    pub total: u64,
    pub active: u64,
    pub pending: u64,
    pub admins: u64,
}

impl HubStorage {
    pub async fn insert_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
        roles: &[String],
    ) -> Result<User> {
        let model = user::ActiveModel {
            email: Set(email.to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            roles: Set(encode_roles(roles)),
            is_active: Set(false),
            otp_code: Set(None),
            otp_expires_at: Set(None),
            approved_by: Set(None),
            approved_at: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("User registered: {} (id {})", username, model.id);
        Ok(model_to_user(model))
    }

    pub async fn find_user(&self, id: i64) -> Result<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_user))
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_user))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_user))
    }

    /// Store a freshly issued OTP on the user row
    pub async fn set_user_otp(
        &self,
        user_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let Some(model) = user::Entity::find_by_id(user_id).one(&self.db).await? else {
            return Err(AgentHubError::not_found(format!("User not found: {}", user_id)));
        };

        let mut am: user::ActiveModel = model.into();
        am.otp_code = Set(Some(code.to_string()));
        am.otp_expires_at = Set(Some(expires_at));
        am.update(&self.db).await?;
        Ok(())
    }

    /// Clear the OTP after successful verification
    pub async fn clear_user_otp(&self, user_id: i64) -> Result<()> {
        let Some(model) = user::Entity::find_by_id(user_id).one(&self.db).await? else {
            return Err(AgentHubError::not_found(format!("User not found: {}", user_id)));
        };

        let mut am: user::ActiveModel = model.into();
        am.otp_code = Set(None);
        am.otp_expires_at = Set(None);
        am.update(&self.db).await?;
        Ok(())
    }

    pub async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> Result<()> {
        let Some(model) = user::Entity::find_by_id(user_id).one(&self.db).await? else {
            return Err(AgentHubError::not_found(format!("User not found: {}", user_id)));
        };

        let mut am: user::ActiveModel = model.into();
        am.password_hash = Set(password_hash.to_string());
        am.update(&self.db).await?;
        Ok(())
    }

    /// Activate a user and stamp approval tracking
    pub async fn activate_user(&self, user_id: i64, approved_by: i64) -> Result<User> {
        let Some(model) = user::Entity::find_by_id(user_id).one(&self.db).await? else {
            return Err(AgentHubError::not_found(format!("User not found: {}", user_id)));
        };

        let mut am: user::ActiveModel = model.into();
        am.is_active = Set(true);
        am.approved_by = Set(Some(approved_by));
        am.approved_at = Set(Some(Utc::now()));
        let updated = am.update(&self.db).await?;

        info!("User activated: {} (by {})", user_id, approved_by);
        Ok(model_to_user(updated))
    }

    pub async fn deactivate_user(&self, user_id: i64) -> Result<User> {
        let Some(model) = user::Entity::find_by_id(user_id).one(&self.db).await? else {
            return Err(AgentHubError::not_found(format!("User not found: {}", user_id)));
        };

        let mut am: user::ActiveModel = model.into();
        am.is_active = Set(false);
        let updated = am.update(&self.db).await?;

        info!("User deactivated: {}", user_id);
        Ok(model_to_user(updated))
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        let result = user::Entity::delete_by_id(user_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AgentHubError::not_found(format!("User not found: {}", user_id)));
        }
        info!("User deleted: {}", user_id);
        Ok(())
    }

    /// Replace the user's role list
    pub async fn set_user_roles(&self, user_id: i64, roles: &[String]) -> Result<User> {
        let Some(model) = user::Entity::find_by_id(user_id).one(&self.db).await? else {
            return Err(AgentHubError::not_found(format!("User not found: {}", user_id)));
        };

        let mut am: user::ActiveModel = model.into();
        am.roles = Set(encode_roles(roles));
        let updated = am.update(&self.db).await?;
        Ok(model_to_user(updated))
    }

    pub async fn list_users(
        &self,
        include_inactive: bool,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<User>> {
        let mut query = user::Entity::find();
        if !include_inactive {
            query = query.filter(user::Column::IsActive.eq(true));
        }

        let models = query
            .order_by_desc(user::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_user).collect())
    }

    pub async fn list_pending_users(&self) -> Result<Vec<User>> {
        let models = user::Entity::find()
            .filter(user::Column::IsActive.eq(false))
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_user).collect())
    }

    /// All active users holding the admin role (notification recipients)
    pub async fn list_active_admins(&self) -> Result<Vec<User>> {
        let models = user::Entity::find()
            .filter(user::Column::IsActive.eq(true))
            .filter(user::Column::Roles.contains(format!("\"{}\"", ROLE_ADMIN)))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_user).collect())
    }

    pub async fn user_counts(&self) -> Result<UserCounts> {
        let total = user::Entity::find().count(&self.db).await?;
        let active = user::Entity::find()
            .filter(user::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;
        let admins = user::Entity::find()
            .filter(user::Column::Roles.contains(format!("\"{}\"", ROLE_ADMIN)))
            .count(&self.db)
            .await?;

        Ok(UserCounts {
            total,
            active,
            pending: total - active,
            admins,
        })
    }

    pub async fn count_users_since(&self, since: DateTime<Utc>) -> Result<u64> {
        let count = user::Entity::find()
            .filter(user::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
