//! Identity service: application-layer orchestration
//!
//! Sign-in, sign-out, the current account and account provisioning.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use super::revocation::TokenRevocations;
use crate::config::AdminConfig;
use crate::domain::{
    Account, Actor, DomainError, DomainResult, Identity, Profile, RepositoryProvider, Role,
};
use crate::infrastructure::crypto::{
    create_token, hash_password, verify_password, verify_token, JwtConfig, TokenClaims,
};

/// Authentication result returned after a successful sign-in
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub account: Account,
}

/// Input of account provisioning, already checked for presence
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Role,
}

pub struct IdentityService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
    revocations: Arc<TokenRevocations>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl IdentityService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        bcrypt_cost: u32,
        revocations: Arc<TokenRevocations>,
    ) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
            revocations,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn sign_in(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let email = normalize_email(email);
        let Some(identity) = self.repos.users().find_identity_by_email(&email).await? else {
            return Err(DomainError::Unauthorized("Invalid login credentials".into()));
        };

        let valid = verify_password(password, &identity.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid login credentials".into()));
        }

        let account = self.current_account(&identity.id).await?;
        let roles = account.roles.iter().map(|r| r.as_str().to_string()).collect();
        let (token, _) = create_token(&identity.id, &identity.email, roles, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        info!(user_id = %identity.id, "User signed in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            account,
        })
    }

    /// Verify a bearer token, refusing signed-out tokens.
    pub fn authenticate(&self, token: &str) -> DomainResult<TokenClaims> {
        let claims = verify_token(token, &self.jwt_config)
            .map_err(|_| DomainError::Unauthorized("Invalid or expired token".into()))?;
        if self.revocations.is_revoked(&claims.jti) {
            return Err(DomainError::Unauthorized("Token has been signed out".into()));
        }
        Ok(claims)
    }

    pub fn sign_out(&self, claims: &TokenClaims) {
        self.revocations.revoke(&claims.jti, claims.exp);
        info!(user_id = %claims.sub, "User signed out");
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn current_account(&self, user_id: &str) -> DomainResult<Account> {
        let profile = self
            .repos
            .users()
            .find_profile(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Profile", user_id))?;
        let roles = self.repos.users().roles_for(user_id).await?;
        Ok(Account { profile, roles })
    }

    /// Caller with the roles currently held in the store.
    pub async fn actor_for(&self, user_id: &str) -> DomainResult<Actor> {
        let roles = self.repos.users().roles_for(user_id).await?;
        Ok(Actor::new(user_id, roles))
    }

    /// All accounts ordered by name.
    pub async fn list_accounts(&self, actor: &Actor) -> DomainResult<Vec<Account>> {
        actor.require_admin()?;
        let profiles = self.repos.users().list_profiles().await?;
        let mut accounts = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let roles = self.repos.users().roles_for(&profile.id).await?;
            accounts.push(Account { profile, roles });
        }
        Ok(accounts)
    }

    // ── Provisioning ────────────────────────────────────────────

    /// Create a confirmed account with exactly one role.
    ///
    /// `actor` must hold `admin` in the store. A duplicate email is a
    /// validation error; any later failure removes what was created.
    pub async fn provision(&self, actor: &Actor, new: NewAccount) -> DomainResult<Account> {
        actor.require_admin()?;
        new.role.ensure_provisionable()?;
        let account = self.create_account(new).await?;
        metrics::counter!("fleet_accounts_provisioned_total").increment(1);
        info!(
            user_id = %account.profile.id,
            role = ?account.primary_role(),
            admin_id = %actor.user_id,
            "Account provisioned"
        );
        Ok(account)
    }

    async fn create_account(&self, new: NewAccount) -> DomainResult<Account> {
        let email = normalize_email(&new.email);
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        let hash = hash_password(&new.password, self.bcrypt_cost)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        let identity = Identity::new(&email, hash);
        let user_id = identity.id.clone();
        self.repos
            .users()
            .create_identity(identity)
            .await
            .map_err(|e| match e {
                DomainError::Conflict(msg) => DomainError::Validation(msg),
                other => other,
            })?;

        let profile = Profile::new(&user_id, new.full_name.trim(), &email, new.phone);
        if let Err(e) = self.repos.users().create_profile(profile.clone()).await {
            self.rollback_account(&user_id, false).await;
            return Err(DomainError::Storage(format!(
                "Failed to create profile: {}",
                e.user_message()
            )));
        }

        let roles = async {
            self.repos.users().clear_roles(&user_id).await?;
            self.repos.users().add_role(&user_id, new.role).await
        }
        .await;
        if let Err(e) = roles {
            self.rollback_account(&user_id, true).await;
            return Err(DomainError::Storage(format!(
                "Failed to assign role: {}",
                e.user_message()
            )));
        }

        Ok(Account {
            profile,
            roles: vec![new.role],
        })
    }

    async fn rollback_account(&self, user_id: &str, with_profile: bool) {
        if with_profile {
            if let Err(e) = self.repos.users().delete_profile(user_id).await {
                warn!(user_id, error = %e, "Failed to remove profile during rollback");
            }
        }
        if let Err(e) = self.repos.users().delete_identity(user_id).await {
            warn!(user_id, error = %e, "Failed to remove identity during rollback");
        }
    }

    /// Create the configured administrator when the store has no identities.
    pub async fn ensure_default_admin(&self, admin: &AdminConfig) -> DomainResult<Option<String>> {
        if self.repos.users().count_identities().await? > 0 {
            return Ok(None);
        }
        let account = self
            .create_account(NewAccount {
                full_name: admin.full_name.clone(),
                email: admin.email.clone(),
                password: admin.password.clone(),
                phone: None,
                role: Role::Admin,
            })
            .await?;
        warn!(
            email = %account.profile.email,
            "Default administrator created; change its password"
        );
        Ok(Some(account.profile.id))
    }
}

// ── Tests ──────────────────────────────────────────────────────
