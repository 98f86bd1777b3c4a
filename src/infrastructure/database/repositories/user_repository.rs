//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use super::{corrupt, db_err, unique_err};
use crate::domain::user::{Identity, Profile, Role, UserRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{identity, profile, user_role};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn identity_to_domain(m: identity::Model) -> Identity {
    Identity {
        id: m.id,
        email: m.email,
        password_hash: m.password_hash,
        email_confirmed: m.email_confirmed,
        created_at: m.created_at,
    }
}

pub(crate) fn profile_to_domain(m: profile::Model) -> Profile {
    Profile {
        id: m.id,
        full_name: m.full_name,
        email: m.email,
        phone: m.phone,
        created_at: m.created_at,
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_identity(&self, identity: Identity) -> DomainResult<()> {
        debug!("Creating identity: {}", identity.email);
        let email = identity.email.clone();
        let model = identity::ActiveModel {
            id: Set(identity.id),
            email: Set(identity.email),
            password_hash: Set(identity.password_hash),
            email_confirmed: Set(identity.email_confirmed),
            created_at: Set(identity.created_at),
        };
        model.insert(&self.db).await.map_err(|e| {
            unique_err(e, || {
                format!("A user with email {} has already been registered", email)
            })
        })?;
        Ok(())
    }

    async fn find_identity_by_email(&self, email: &str) -> DomainResult<Option<Identity>> {
        let model = identity::Entity::find()
            .filter(identity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(identity_to_domain))
    }

    async fn delete_identity(&self, id: &str) -> DomainResult<()> {
        debug!("Deleting identity: {}", id);
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        identity::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn count_identities(&self) -> DomainResult<u64> {
        identity::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn create_profile(&self, profile: Profile) -> DomainResult<()> {
        debug!("Creating profile: {}", profile.id);
        let id = profile.id.clone();
        let model = profile::ActiveModel {
            id: Set(profile.id),
            full_name: Set(profile.full_name),
            email: Set(profile.email),
            phone: Set(profile.phone),
            created_at: Set(profile.created_at),
        };
        model
            .insert(&self.db)
            .await
            .map_err(|e| unique_err(e, || format!("Profile {} already exists", id)))?;
        Ok(())
    }

    async fn find_profile(&self, id: &str) -> DomainResult<Option<Profile>> {
        let model = profile::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(profile_to_domain))
    }

    async fn list_profiles(&self) -> DomainResult<Vec<Profile>> {
        let models = profile::Entity::find()
            .order_by_asc(profile::Column::FullName)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(profile_to_domain).collect())
    }

    async fn delete_profile(&self, id: &str) -> DomainResult<()> {
        profile::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn roles_for(&self, user_id: &str) -> DomainResult<Vec<Role>> {
        let models = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(user_role::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models
            .into_iter()
            .map(|m| Role::from_str(&m.role).ok_or_else(|| corrupt("role", &m.role)))
            .collect()
    }

    async fn clear_roles(&self, user_id: &str) -> DomainResult<u64> {
        let result = user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn add_role(&self, user_id: &str, role: Role) -> DomainResult<()> {
        debug!("Granting role {} to {}", role, user_id);
        let existing = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::Role.eq(role.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Ok(());
        }
        let model = user_role::ActiveModel {
            user_id: Set(user_id.to_string()),
            role: Set(role.as_str().to_string()),
            ..Default::default()
        };
        match model.insert(&self.db).await {
            Ok(_) => Ok(()),
            // lost a race against the same grant
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(()),
            Err(e) => Err(db_err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::database::repositories::test_db;

    #[tokio::test]
    async fn identity_email_is_unique() {
        let repo = SeaOrmUserRepository::new(test_db::connect().await);
        repo.create_identity(Identity::new("a@fleet.local", "hash"))
            .await
            .unwrap();
        let err = repo
            .create_identity(Identity::new("a@fleet.local", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(repo.count_identities().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn roles_are_granted_once_and_cleared() {
        let repo = SeaOrmUserRepository::new(test_db::connect().await);
        let identity = Identity::new("m@fleet.local", "hash");
        let id = identity.id.clone();
        repo.create_identity(identity).await.unwrap();

        repo.add_role(&id, Role::Employee).await.unwrap();
        repo.add_role(&id, Role::Employee).await.unwrap();
        repo.add_role(&id, Role::VehicleManager).await.unwrap();
        assert_eq!(
            repo.roles_for(&id).await.unwrap(),
            vec![Role::Employee, Role::VehicleManager]
        );

        assert_eq!(repo.clear_roles(&id).await.unwrap(), 2);
        assert!(repo.roles_for(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn profiles_listed_by_name_and_removed_with_identity() {
        let repo = SeaOrmUserRepository::new(test_db::connect().await);
        for (name, email) in [("Zara", "z@fleet.local"), ("Amit", "a@fleet.local")] {
            let identity = Identity::new(email, "hash");
            let id = identity.id.clone();
            repo.create_identity(identity).await.unwrap();
            repo.create_profile(Profile::new(&id, name, email, None))
                .await
                .unwrap();
        }
        let names: Vec<_> = repo
            .list_profiles()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.full_name)
            .collect();
        assert_eq!(names, vec!["Amit", "Zara"]);

        let amit = repo
            .find_identity_by_email("a@fleet.local")
            .await
            .unwrap()
            .unwrap();
        repo.delete_profile(&amit.id).await.unwrap();
        repo.delete_identity(&amit.id).await.unwrap();
        assert!(repo.find_profile(&amit.id).await.unwrap().is_none());
        assert!(repo
            .find_identity_by_email("a@fleet.local")
            .await
            .unwrap()
            .is_none());
    }
}
