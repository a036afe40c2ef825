use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::account_repository::{AccountRepository, InsertError};
use crate::domain::accounts::account::{Account, NewAccount};
use crate::infrastructure::db::PgPool;

pub struct SqlxAccountRepository {
    pub pool: PgPool,
}

impl SqlxAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(row: &PgRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        credential_hash: row.try_get("credential_hash")?,
        display_name: row.try_get("display_name")?,
        created_at: row.try_get("created_at")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl AccountRepository for SqlxAccountRepository {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query(
            r#"SELECT id, email, credential_hash, display_name, created_at
               FROM accounts WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_row).transpose()?)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, InsertError> {
        let res = sqlx::query(
            r#"INSERT INTO accounts (email, credential_hash, display_name) VALUES ($1, $2, $3)
               RETURNING id, email, credential_hash, display_name, created_at"#,
        )
        .bind(&account.email)
        .bind(&account.credential_hash)
        .bind(&account.display_name)
        .fetch_one(&self.pool)
        .await;
        match res {
            Ok(row) => map_row(&row).map_err(|e| InsertError::Other(e.into())),
            Err(e) if is_unique_violation(&e) => Err(InsertError::Duplicate),
            Err(e) => Err(InsertError::Other(e.into())),
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
