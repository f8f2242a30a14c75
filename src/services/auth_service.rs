use uuid::Uuid;

use crate::{
    auth::{
        Role, TokenBundle,
        jwt::{ACCESS_TTL_SECS, JwtKeys, encode_token, make_access_claims},
        password::{hash_password, verify_password},
        policy::{self, Action},
    },
    config::AuthConfig,
    db::entities::user,
    error::AppError,
};

use super::user_service::UserService;

/// Accepts anything shaped like `local@domain.tld`. Uniqueness is what the
/// database enforces; this only catches obvious typos early.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    jwt: JwtKeys,
}

impl AuthService {
    pub fn new(users: UserService, jwt: JwtKeys) -> Self {
        Self { users, jwt }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<user::Model, AppError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AppError::bad_request("Invalid email address"));
        }
        let role =
            Role::try_from(role).map_err(|_| AppError::bad_request("Invalid role"))?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::duplicate("Email already registered"));
        }

        let password_hash = hash_password(password)?;
        self.users.create_user(email, &password_hash, role.as_str()).await
    }

    /// Unknown email and wrong password produce the same rejection, so the
    /// endpoint cannot be used to probe which addresses have accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        let claims = make_access_claims(&user.id, ACCESS_TTL_SECS);
        Ok(TokenBundle {
            access_token: encode_token(&self.jwt, &claims)?,
            token_type: "Bearer",
            expires_in: ACCESS_TTL_SECS,
        })
    }

    pub async fn delete_account(
        &self,
        requester_id: &Uuid,
        requester_role: &Role,
        target_id: &Uuid,
    ) -> Result<(), AppError> {
        policy::require_role(Action::DeleteAccount, requester_role)?;
        policy::require_scope(Action::DeleteAccount, requester_id, requester_role, target_id)?;
        self.users.delete_user(target_id).await
    }

    /// Idempotent bootstrap: creates the configured admin account on first
    /// start and leaves an existing one untouched.
    pub async fn seed_admin(&self, cfg: &AuthConfig) -> Result<(), AppError> {
        if self.users.find_by_email(&cfg.admin_email).await?.is_some() {
            tracing::debug!(email = %cfg.admin_email, "admin account already present");
            return Ok(());
        }

        let password_hash = hash_password(&cfg.admin_password)?;
        let admin = self
            .users
            .create_user(&cfg.admin_email, &password_hash, Role::Admin.as_str())
            .await?;
        tracing::info!(email = %admin.email, "seeded admin account");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use uuid::Uuid;

    use crate::{
        auth::{jwt::JwtKeys, jwt::decode_token, password::hash_password},
        db::dao::DaoBase,
        db::entities::user,
        error::AppError,
        services::user_service::UserService,
    };

    use super::{AuthService, is_valid_email};

    fn service(db: &DatabaseConnection) -> AuthService {
        AuthService::new(
            UserService::new(DaoBase::new(db)),
            JwtKeys::from_secret(b"unit-test-secret"),
        )
    }

    fn user_model(email: &str, password_hash: &str) -> user::Model {
        let now = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid");
        user::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: "attendee".to_string(),
            reset_token: None,
            reset_token_expires_at: None,
        }
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@nodot"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice @example.com"));
    }

    #[tokio::test]
    async fn register_rejects_malformed_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(&db)
            .register("not-an-email", "pw123456", "attendee")
            .await
            .expect_err("register should fail");
        assert_eq!(err.message(), "Invalid email address");
    }

    #[tokio::test]
    async fn register_rejects_unknown_role() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(&db)
            .register("alice@example.com", "pw123456", "superuser")
            .await
            .expect_err("register should fail");
        assert_eq!(err.message(), "Invalid role");
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model("alice@example.com", "hash")]])
            .into_connection();

        let err = service(&db)
            .register("alice@example.com", "pw123456", "attendee")
            .await
            .expect_err("register should fail");
        assert!(matches!(err, AppError::Duplicate(_)));
        assert_eq!(err.message(), "Email already registered");
    }

    #[tokio::test]
    async fn login_rejects_unknown_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let err = service(&db)
            .login("nobody@example.com", "pw123456")
            .await
            .expect_err("login should fail");
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let hash = hash_password("pw123456").expect("hash should succeed");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model("alice@example.com", &hash)]])
            .into_connection();

        let err = service(&db)
            .login("alice@example.com", "pw654321")
            .await
            .expect_err("login should fail");
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn login_issues_bearer_token_for_the_user() {
        let hash = hash_password("pw123456").expect("hash should succeed");
        let account = user_model("alice@example.com", &hash);
        let account_id = account.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[account]])
            .into_connection();

        let bundle = service(&db)
            .login("alice@example.com", "pw123456")
            .await
            .expect("login should succeed");
        assert_eq!(bundle.token_type, "Bearer");

        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let claims = decode_token(&keys, &bundle.access_token).expect("token should decode");
        assert_eq!(claims.sub, account_id.to_string());
    }

    #[tokio::test]
    async fn delete_account_forbidden_for_unrelated_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(&db)
            .delete_account(
                &Uuid::new_v4(),
                &crate::auth::Role::Attendee,
                &Uuid::new_v4(),
            )
            .await
            .expect_err("delete should be refused");
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
