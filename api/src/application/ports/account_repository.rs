use async_trait::async_trait;

use crate::domain::accounts::account::{Account, NewAccount};

#[derive(thiserror::Error, Debug)]
pub enum InsertError {
    #[error("an account with this email already exists")]
    Duplicate,
    #[error("failed to persist account")]
    Other(#[source] anyhow::Error),
}

/// Store capability set consumed by the auth use cases. Emails passed in are
/// already normalized.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Account>>;
    async fn insert(&self, account: NewAccount) -> Result<Account, InsertError>;
    async fn ping(&self) -> anyhow::Result<()>;
}
