//! Identity, profile and role entities

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Role label attached to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    VehicleManager,
    Employee,
}

impl Role {
    /// Roles an administrator may hand out through account provisioning.
    pub const PROVISIONABLE: [Role; 2] = [Role::Employee, Role::VehicleManager];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::VehicleManager => "vehicle_manager",
            Self::Employee => "employee",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "vehicle_manager" => Some(Self::VehicleManager),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }

    /// Lower rank wins when picking the primary role.
    fn rank(&self) -> u8 {
        match self {
            Self::Admin => 0,
            Self::VehicleManager => 1,
            Self::Employee => 2,
        }
    }

    pub fn is_provisionable(&self) -> bool {
        Self::PROVISIONABLE.contains(self)
    }

    /// `self` if an administrator may hand it out.
    pub fn ensure_provisionable(self) -> DomainResult<Self> {
        if self.is_provisionable() {
            Ok(self)
        } else {
            Err(Self::not_provisionable())
        }
    }

    /// Parse a role label that provisioning accepts.
    pub fn parse_provisionable(s: &str) -> DomainResult<Self> {
        Self::from_str(s.trim())
            .ok_or_else(Self::not_provisionable)?
            .ensure_provisionable()
    }

    fn not_provisionable() -> DomainError {
        DomainError::Validation(format!(
            "Invalid role. Must be one of: {}",
            Self::PROVISIONABLE
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role used for dashboard routing: `admin > vehicle_manager > employee`.
///
/// Returns `None` for a user without any role.
pub fn primary_role(roles: &[Role]) -> Option<Role> {
    roles.iter().copied().min_by_key(Role::rank)
}

/// Credentials record owned by the identity provider
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            password_hash: password_hash.into(),
            email_confirmed: true,
            created_at: Utc::now(),
        }
    }
}

/// Public identity metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            email: email.into(),
            phone,
            created_at: Utc::now(),
        }
    }
}

/// Profile together with its role set
#[derive(Debug, Clone)]
pub struct Account {
    pub profile: Profile,
    pub roles: Vec<Role>,
}

impl Account {
    pub fn primary_role(&self) -> Option<Role> {
        primary_role(&self.roles)
    }
}

/// The authenticated caller of an operation
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub roles: Vec<Role>,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            user_id: user_id.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Managers and admins may run the fleet desk.
    pub fn is_manager(&self) -> bool {
        self.has_role(Role::VehicleManager) || self.is_admin()
    }

    pub fn require_manager(&self) -> DomainResult<()> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(DomainError::Forbidden("Vehicle manager role required".into()))
        }
    }

    pub fn require_admin(&self) -> DomainResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden("Admin role required".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_role_precedence() {
        assert_eq!(
            primary_role(&[Role::Employee, Role::Admin, Role::VehicleManager]),
            Some(Role::Admin)
        );
        assert_eq!(
            primary_role(&[Role::Employee, Role::VehicleManager]),
            Some(Role::VehicleManager)
        );
        assert_eq!(primary_role(&[Role::Employee]), Some(Role::Employee));
        assert_eq!(primary_role(&[]), None);
    }

    #[test]
    fn role_strings_roundtrip() {
        for role in [Role::Admin, Role::VehicleManager, Role::Employee] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("superuser"), None);
    }

    #[test]
    fn admin_is_not_provisionable() {
        assert!(!Role::Admin.is_provisionable());
        assert!(Role::Employee.is_provisionable());
        assert!(Role::VehicleManager.is_provisionable());
    }

    #[test]
    fn provisioning_role_labels() {
        assert_eq!(Role::parse_provisionable(" employee ").unwrap(), Role::Employee);
        assert_eq!(
            Role::parse_provisionable("vehicle_manager").unwrap(),
            Role::VehicleManager
        );
        for label in ["admin", "superuser", ""] {
            match Role::parse_provisionable(label) {
                Err(DomainError::Validation(msg)) => {
                    assert_eq!(msg, "Invalid role. Must be one of: employee, vehicle_manager")
                }
                other => panic!("{:?} accepted as {:?}", label, other),
            }
        }
        assert!(Role::Admin.ensure_provisionable().is_err());
    }

    #[test]
    fn actor_permissions() {
        let employee = Actor::new("u1", vec![Role::Employee]);
        assert!(!employee.is_manager());
        assert!(matches!(employee.require_manager(), Err(DomainError::Forbidden(_))));

        let admin = Actor::new("u2", vec![Role::Admin]);
        assert!(admin.is_manager());
        assert!(admin.require_admin().is_ok());

        let manager = Actor::new("u3", vec![Role::VehicleManager]);
        assert!(manager.require_manager().is_ok());
        assert!(manager.require_admin().is_err());
    }
}
