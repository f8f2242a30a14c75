use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::jwt::JwtKeys,
    config::AppConfig,
    mail::{LogMailer, Mailer, SmtpMailer},
    services::ServiceContext,
};

pub struct AppState {
    pub config: AppConfig,
    pub jwt: JwtKeys,
    pub services: ServiceContext,
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Arc<Self> {
        let secret = match config.auth.as_ref() {
            Some(auth) => auth.jwt_secret.clone(),
            None => {
                tracing::warn!("no auth config present; tokens use a development-only secret");
                "development-only-secret".to_string()
            }
        };
        let jwt = JwtKeys::from_secret(secret.as_bytes());

        let mailer: Arc<dyn Mailer> = match config.mail.clone() {
            Some(mail_cfg) => Arc::new(SmtpMailer::new(mail_cfg)),
            None => Arc::new(LogMailer),
        };
        let reset_base_url = match config.mail.as_ref() {
            Some(mail_cfg) => mail_cfg.reset_base_url.clone(),
            None => format!(
                "http://{}:{}/password/reset-password",
                config.general.host, config.general.port
            ),
        };

        let services = ServiceContext::new(&db, jwt.clone(), mailer, reset_base_url);

        Arc::new(Self {
            config,
            jwt,
            services,
            db,
        })
    }
}
