use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::blockchain::{Notarizer, Notary};
use crate::config::Config;
use crate::utils::jwt::JwtManager;

/// Shared handles available to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub jwt: JwtManager,
    /// `None` when no chain is configured.
    pub notary: Option<Arc<dyn Notary>>,
    pub notarizer: Option<Notarizer>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        config: Config,
        notary: Option<Arc<dyn Notary>>,
        notarizer: Option<Notarizer>,
    ) -> Self {
        let secret = match &config.jwt_secret {
            Some(secret) if !secret.is_empty() => secret.clone(),
            _ => {
                tracing::warn!("JWT_SECRET not set, generating a random secret for this process");
                crate::utils::random::generate_random_string(64)
            }
        };
        let jwt = JwtManager::new(&secret, config.jwt_expires_in);

        Self {
            db,
            config: Arc::new(config),
            jwt,
            notary,
            notarizer,
        }
    }
}
