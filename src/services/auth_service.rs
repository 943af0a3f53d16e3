//! Authentication service
//!
//! Registration, the OTP login flow, token refresh, and password changes.
//! Accounts start inactive and become usable only after an admin approves
//! them; login is a two-step exchange (username -> OTP -> token pair).

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::api::jwt::get_jwt_service;
use crate::config::get_config;
use crate::errors::{AgentHubError, Result};
use crate::services::notify::{Notifier, send_detached};
use crate::storage::models::ROLE_USER;
use crate::storage::{HubStorage, User};
use crate::utils::otp::{generate_otp, otp_matches};
use crate::utils::password::{hash_password, verify_password};

/// Issued access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Outcome of login initiation
#[derive(Debug, Clone)]
pub struct OtpIssue {
    /// Echoed back only when the notifier backend is development-only
    pub otp_code: Option<String>,
    pub expires_in_minutes: u64,
}

pub struct AuthService {
    storage: Arc<HubStorage>,
    notifier: Arc<dyn Notifier>,
}

impl AuthService {
    pub fn new(storage: Arc<HubStorage>, notifier: Arc<dyn Notifier>) -> Self {
        Self { storage, notifier }
    }

    /// Register a new (inactive) account and notify active admins
    pub async fn register(&self, email: &str, username: &str, password: &str) -> Result<User> {
        if self.storage.find_user_by_email(email).await?.is_some() {
            return Err(AgentHubError::conflict("Email already registered"));
        }

        if self.storage.find_user_by_username(username).await?.is_some() {
            return Err(AgentHubError::conflict("Username already taken"));
        }

        let password_hash = hash_password(password)
            .map_err(|e| AgentHubError::validation(format!("Cannot hash password: {}", e)))?;

        let user = self
            .storage
            .insert_user(email, username, &password_hash, &[ROLE_USER.to_string()])
            .await?;

        for admin in self.storage.list_active_admins().await? {
            send_detached(
                self.notifier.clone(),
                admin.email.clone(),
                "New User Registration - AI Agent Hub".to_string(),
                format!(
                    "<h2>New User Registration</h2>\
                     <p>User <strong>{}</strong> ({}) registered and is waiting for approval.</p>",
                    username, email
                ),
            );
        }

        Ok(user)
    }

    /// Start the login flow: issue and deliver an OTP
    pub async fn initiate_login(&self, username: &str) -> Result<OtpIssue> {
        let user = self
            .storage
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AgentHubError::authentication("Invalid username"))?;

        if !user.is_active {
            return Err(AgentHubError::authentication(
                "Account not activated. Please wait for admin approval.",
            ));
        }

        let config = get_config();
        let code = generate_otp(config.auth.otp_length);
        let expires_at = Utc::now() + Duration::minutes(config.auth.otp_expire_minutes as i64);

        self.storage.set_user_otp(user.id, &code, expires_at).await?;

        // Delivery failure must not leak into the login response; the code
        // stays valid and the user can retry.
        if let Err(e) = self
            .notifier
            .send(
                &user.email,
                "Your login code - AI Agent Hub",
                &format!(
                    "<h2>Login Verification</h2>\
                     <p>Hello {}, your one-time code is <strong>{}</strong>. \
                     It expires in {} minutes.</p>",
                    username, code, config.auth.otp_expire_minutes
                ),
            )
            .await
        {
            warn!("OTP delivery to {} failed: {}", user.email, e);
        }

        info!("OTP issued for {}", username);
        Ok(OtpIssue {
            otp_code: self.notifier.echoes_otp().then_some(code),
            expires_in_minutes: config.auth.otp_expire_minutes,
        })
    }

    /// Complete the login flow: verify the OTP and mint tokens
    pub async fn verify_otp(&self, username: &str, submitted_code: &str) -> Result<(TokenPair, User)> {
        let user = self
            .storage
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AgentHubError::authentication("Invalid username"))?;

        let (Some(stored_code), Some(expires_at)) = (&user.otp_code, user.otp_expires_at) else {
            return Err(AgentHubError::authentication(
                "OTP has expired. Please request a new one.",
            ));
        };

        if expires_at < Utc::now() {
            return Err(AgentHubError::authentication(
                "OTP has expired. Please request a new one.",
            ));
        }

        if !otp_matches(submitted_code, stored_code) {
            return Err(AgentHubError::authentication("Invalid OTP code"));
        }

        self.storage.clear_user_otp(user.id).await?;

        let tokens = self.issue_tokens(&user.username)?;
        info!("Login completed for {}", username);
        Ok((tokens, user))
    }

    /// Exchange a valid refresh token for a new pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<(TokenPair, User)> {
        let claims = get_jwt_service()
            .validate_refresh_token(refresh_token)
            .map_err(|e| AgentHubError::authentication(format!("Invalid refresh token: {}", e)))?;

        let user = self
            .storage
            .find_user_by_username(&claims.sub)
            .await?
            .ok_or_else(|| AgentHubError::authentication("Unknown user"))?;

        if !user.is_active {
            return Err(AgentHubError::authentication("Account is deactivated"));
        }

        let tokens = self.issue_tokens(&user.username)?;
        Ok((tokens, user))
    }

    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let valid = verify_password(current_password, &user.password_hash)
            .map_err(|e| AgentHubError::validation(format!("Cannot verify password: {}", e)))?;

        if !valid {
            return Err(AgentHubError::validation("Current password is incorrect"));
        }

        let new_hash = hash_password(new_password)
            .map_err(|e| AgentHubError::validation(format!("Cannot hash password: {}", e)))?;

        self.storage.set_password_hash(user.id, &new_hash).await?;
        info!("Password changed for {}", user.username);
        Ok(())
    }

    fn issue_tokens(&self, username: &str) -> Result<TokenPair> {
        let jwt = get_jwt_service();
        let access_token = jwt
            .generate_access_token(username)
            .map_err(|e| AgentHubError::authentication(format!("Token generation failed: {}", e)))?;
        let refresh_token = jwt
            .generate_refresh_token(username)
            .map_err(|e| AgentHubError::authentication(format!("Token generation failed: {}", e)))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}
