use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::application::ports::store_connector::StoreConnector;

pub type PgPool = Pool<Postgres>;

pub async fn connect_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    // Uses compile-time embedded migrations under ./migrations
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub struct PgConnector {
    database_url: String,
    max_connections: u32,
}

impl PgConnector {
    pub fn new(database_url: impl Into<String>, max_connections: u32) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections,
        }
    }
}

#[async_trait]
impl StoreConnector for PgConnector {
    type Handle = PgPool;

    async fn connect(&self, timeout: Duration) -> anyhow::Result<PgPool> {
        connect_pool(&self.database_url, self.max_connections, timeout).await
    }

    fn target(&self) -> String {
        redact_url(&self.database_url)
    }
}

/// Drops the userinfo section of a connection URL.
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return "<unparsed>".into();
    };
    match rest.rsplit_once('@') {
        Some((_, host)) => format!("{scheme}://***@{host}"),
        None => url.to_string(),
    }
}

pub mod repositories;

#[cfg(test)]
mod tests {
    use super::redact_url;

    #[test]
    fn redacts_credentials() {
        assert_eq!(
            redact_url("postgres://root:example@db:5432/accounts"),
            "postgres://***@db:5432/accounts"
        );
        assert_eq!(
            redact_url("postgres://db:5432/accounts"),
            "postgres://db:5432/accounts"
        );
        assert_eq!(redact_url("garbage"), "<unparsed>");
    }
}
