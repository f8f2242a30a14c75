use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::user;

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = user::Entity;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(user::Column::Email.eq(email))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.to_string()),
            reset_token: Set(None),
            reset_token_expires_at: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_reset_token(&self, token: &str) -> DaoResult<Option<user::Model>> {
        let token = token.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(user::Column::ResetToken.eq(token))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn set_reset_token(
        &self,
        id: &Uuid,
        token: &str,
        expires_at: &DateTime<FixedOffset>,
    ) -> DaoResult<user::Model> {
        let token = token.to_string();
        let expires_at = *expires_at;
        self.update(*id, move |active| {
            active.reset_token = Set(Some(token));
            active.reset_token_expires_at = Set(Some(expires_at));
        })
        .await
    }

    /// Stores the new hash and clears the reset fields in one update, which
    /// is what makes a reset token single-use.
    pub async fn reset_password(&self, id: &Uuid, password_hash: &str) -> DaoResult<user::Model> {
        let password_hash = password_hash.to_string();
        self.update(*id, move |active| {
            active.password_hash = Set(password_hash);
            active.reset_token = Set(None);
            active.reset_token_expires_at = Set(None);
        })
        .await
    }

    pub async fn delete_user(&self, id: &Uuid) -> DaoResult<Uuid> {
        self.delete(*id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::db::entities::user;

    use super::UserDao;
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn user_model(id: Uuid, email: &str) -> user::Model {
        let now = ts();
        user::Model {
            id,
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: "attendee".to_string(),
            reset_token: None,
            reset_token_expires_at: None,
        }
    }

    #[tokio::test]
    async fn find_by_email_returns_first_match() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(id, "alice@example.com")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_email("alice@example.com")
            .await
            .expect("query should succeed");
        assert_eq!(result.map(|u| u.id), Some(id));
    }

    #[tokio::test]
    async fn find_by_email_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_email("missing@example.com")
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn find_by_reset_token_returns_holder() {
        let id = Uuid::new_v4();
        let mut holder = user_model(id, "alice@example.com");
        holder.reset_token = Some("reset-token-1".to_string());
        holder.reset_token_expires_at = Some(ts() + Duration::hours(1));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[holder]])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_reset_token("reset-token-1")
            .await
            .expect("query should succeed")
            .expect("user should be found");
        assert_eq!(result.id, id);
        assert_eq!(result.reset_token.as_deref(), Some("reset-token-1"));
    }

    #[tokio::test]
    async fn set_reset_token_propagates_not_found() {
        let missing_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao
            .set_reset_token(&missing_id, "token", &(ts() + Duration::hours(1)))
            .await
            .expect_err("update should fail");
        assert!(matches!(
            err,
            DaoLayerError::NotFound { id, .. } if id == missing_id
        ));
    }
}
