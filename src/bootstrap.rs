use anyhow::{Context, Result};

use crate::config::Config;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::repositories::{NewUser, UserRepository};
use sea_orm::DatabaseConnection;

/// Creates the default admin from `ADMIN_EMAIL` / `ADMIN_PASSWORD` when both
/// are set and the account does not exist yet.
pub async fn initialize_admin_user(db: &DatabaseConnection, config: &Config) -> Result<()> {
    let (Some(admin_email), Some(admin_password)) = (&config.admin_email, &config.admin_password)
    else {
        tracing::info!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin initialization");
        return Ok(());
    };

    let admin_email = admin_email.trim().to_lowercase();
    let user_repo = UserRepository::new(db);

    if user_repo
        .email_exists(&admin_email)
        .await
        .context("Failed to check existing admin")?
    {
        tracing::info!("Admin user already exists, skipping initialization");
        return Ok(());
    }

    tracing::info!("Creating default admin user...");

    let hashed_password = bcrypt::hash(admin_password, config.bcrypt_cost)
        .context("Failed to hash admin password")?;

    user_repo
        .create(NewUser {
            email: admin_email.clone(),
            password: hashed_password,
            role: RoleEnum::Admin,
            full_name: "System Administrator".to_string(),
            organization: None,
            phone: None,
            verified: true,
        })
        .await
        .context("Failed to insert admin user")?;

    tracing::info!(email = %admin_email, "Admin user created");
    tracing::warn!("Please change the default admin password after first login");

    Ok(())
}
