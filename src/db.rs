use std::time::Duration;

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Connects to `database_url` and brings the schema up to date.
pub async fn connect_database(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    // Every pooled connection to `sqlite::memory:` opens its own empty database.
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(20);
    }

    let db = Database::connect(options)
        .await
        .with_context(|| format!("Failed to connect to {}", redact_url(database_url)))?;

    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;

    Ok(db)
}

fn redact_url(database_url: &str) -> String {
    match (database_url.find("://"), database_url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &database_url[..scheme_end], &database_url[at..])
        }
        _ => database_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_credentials_in_logged_url() {
        assert_eq!(
            redact_url("postgres://certify:secret@db:5432/certify"),
            "postgres://***@db:5432/certify"
        );
        assert_eq!(redact_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[tokio::test]
    async fn migrates_in_memory_sqlite() {
        let db = connect_database("sqlite::memory:").await.unwrap();
        let repo = crate::repositories::UserRepository::new(&db);
        assert_eq!(repo.count_by_role(None).await.unwrap(), 0);
    }
}
