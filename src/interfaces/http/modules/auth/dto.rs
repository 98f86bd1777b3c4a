//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Account;

/// Label shown for an account that holds no role
pub const NO_ROLE_LABEL: &str = "No role assigned";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignInResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub account: AccountDto,
}

/// Profile plus roles, with the role used for dashboard routing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountDto {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub roles: Vec<String>,
    /// `admin > vehicle_manager > employee`, `null` without roles
    pub primary_role: Option<String>,
    pub role_label: String,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        let primary_role = account.primary_role().map(|r| r.as_str().to_string());
        let role_label = primary_role
            .clone()
            .unwrap_or_else(|| NO_ROLE_LABEL.to_string());
        Self {
            id: account.profile.id,
            full_name: account.profile.full_name,
            email: account.profile.email,
            phone: account.profile.phone,
            roles: account
                .roles
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
            primary_role,
            role_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Profile, Role};

    fn account(roles: Vec<Role>) -> Account {
        Account {
            profile: Profile::new("u1", "Asha", "asha@fleet.local", None),
            roles,
        }
    }

    #[test]
    fn primary_role_picks_highest() {
        let dto = AccountDto::from(account(vec![Role::Employee, Role::Admin]));
        assert_eq!(dto.primary_role.as_deref(), Some("admin"));
        assert_eq!(dto.role_label, "admin");
        assert_eq!(dto.roles, vec!["employee", "admin"]);
    }

    #[test]
    fn roleless_account_is_labelled() {
        let dto = AccountDto::from(account(vec![]));
        assert!(dto.primary_role.is_none());
        assert_eq!(dto.role_label, NO_ROLE_LABEL);
    }
}
