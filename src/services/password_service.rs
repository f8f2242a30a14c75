use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::{Rng, distributions::Alphanumeric, thread_rng};

use crate::{
    auth::password::hash_password,
    error::AppError,
    mail::Mailer,
};

use super::user_service::UserService;

const RESET_TOKEN_LEN: usize = 48;
const RESET_TTL_SECS: i64 = 60 * 60;

pub const RESET_TOKEN_REJECTED_MESSAGE: &str = "Invalid or expired reset token";

fn generate_reset_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[derive(Clone)]
pub struct PasswordResetService {
    users: UserService,
    mailer: Arc<dyn Mailer>,
    reset_base_url: String,
}

impl PasswordResetService {
    pub fn new(users: UserService, mailer: Arc<dyn Mailer>, reset_base_url: String) -> Self {
        Self {
            users,
            mailer,
            reset_base_url,
        }
    }

    /// Stores a fresh token before mailing it, so a failed delivery can be
    /// retried without invalidating anything.
    pub async fn request_reset(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::not_found("No account with that email"))?;

        let token = generate_reset_token();
        let expires_at = Utc::now().fixed_offset() + Duration::seconds(RESET_TTL_SECS);
        self.users
            .dao()
            .set_reset_token(&user.id, &token, &expires_at)
            .await?;

        let link = format!("{}/{}", self.reset_base_url.trim_end_matches('/'), token);
        let body = format!(
            "A password reset was requested for this account.\n\n\
             Open {link} within the next hour to choose a new password.\n\
             If you did not request this, you can ignore this mail."
        );

        self.mailer
            .send(&user.email, "Password reset", &body)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "reset mail delivery failed");
                AppError::delivery("Could not send the reset email")
            })
    }

    /// Expired tokens and tokens that were never issued are rejected alike.
    pub async fn consume_reset(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let user = self
            .users
            .dao()
            .find_by_reset_token(token)
            .await?
            .ok_or_else(|| AppError::bad_request(RESET_TOKEN_REJECTED_MESSAGE))?;

        let still_valid = user
            .reset_token_expires_at
            .is_some_and(|expires_at| expires_at > Utc::now().fixed_offset());
        if !still_valid {
            return Err(AppError::bad_request(RESET_TOKEN_REJECTED_MESSAGE));
        }

        let password_hash = hash_password(new_password)?;
        self.users.dao().reset_password(&user.id, &password_hash).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, FixedOffset, TimeZone, Utc};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use uuid::Uuid;

    use crate::{
        db::dao::DaoBase, db::entities::user, error::AppError, mail::LogMailer,
        services::user_service::UserService,
    };

    use super::{
        PasswordResetService, RESET_TOKEN_LEN, RESET_TOKEN_REJECTED_MESSAGE, generate_reset_token,
    };

    fn service(db: &DatabaseConnection) -> PasswordResetService {
        PasswordResetService::new(
            UserService::new(DaoBase::new(db)),
            Arc::new(LogMailer),
            "http://localhost:3000/password/reset-password".to_string(),
        )
    }

    fn user_model(email: &str) -> user::Model {
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
            password_hash: "hash".to_string(),
            role: "attendee".to_string(),
            reset_token: None,
            reset_token_expires_at: None,
        }
    }

    #[test]
    fn reset_tokens_are_long_and_alphanumeric() {
        let token = generate_reset_token();

        assert_eq!(token.len(), RESET_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_reset_token());
    }

    #[tokio::test]
    async fn request_reset_rejects_unknown_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let err = service(&db)
            .request_reset("nobody@example.com")
            .await
            .expect_err("request should fail");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn request_reset_stores_token_and_logs_mail() {
        let account = user_model("alice@example.com");
        let mut updated = account.clone();
        updated.reset_token = Some("stored".to_string());
        updated.reset_token_expires_at = Some(Utc::now().fixed_offset() + Duration::hours(1));

        // find_by_email, then the token update (find + returning row).
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![account.clone()],
                vec![account],
                vec![updated],
            ])
            .into_connection();

        service(&db)
            .request_reset("alice@example.com")
            .await
            .expect("request should succeed");
    }

    #[tokio::test]
    async fn consume_reset_rejects_unknown_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let err = service(&db)
            .consume_reset("no-such-token", "pw123456")
            .await
            .expect_err("consume should fail");
        assert_eq!(err.message(), RESET_TOKEN_REJECTED_MESSAGE);
    }

    #[tokio::test]
    async fn consume_reset_rejects_expired_token() {
        let mut holder = user_model("alice@example.com");
        holder.reset_token = Some("expired-token".to_string());
        holder.reset_token_expires_at = Some(Utc::now().fixed_offset() - Duration::minutes(5));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[holder]])
            .into_connection();

        let err = service(&db)
            .consume_reset("expired-token", "pw123456")
            .await
            .expect_err("consume should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.message(), RESET_TOKEN_REJECTED_MESSAGE);
    }

    #[tokio::test]
    async fn consume_reset_rejects_short_replacement_password() {
        let mut holder = user_model("alice@example.com");
        holder.reset_token = Some("valid-token".to_string());
        holder.reset_token_expires_at = Some(Utc::now().fixed_offset() + Duration::hours(1));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[holder]])
            .into_connection();

        let err = service(&db)
            .consume_reset("valid-token", "short")
            .await
            .expect_err("consume should fail");
        assert_eq!(err.message(), "Password too short");
    }
}
