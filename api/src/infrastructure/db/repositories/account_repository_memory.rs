use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::account_repository::{AccountRepository, InsertError};
use crate::application::ports::store_connector::StoreConnector;
use crate::domain::accounts::account::{Account, NewAccount};

/// Process-local account store keyed by normalized email. Used for local
/// development (`STORE_BACKEND=memory`) and in tests.
#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    accesses: Arc<AtomicUsize>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lookups and inserts served so far.
    pub fn store_accesses(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Account>> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, InsertError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.email) {
            return Err(InsertError::Duplicate);
        }
        let created = Account {
            id: Uuid::new_v4(),
            email: account.email,
            credential_hash: account.credential_hash,
            display_name: account.display_name,
            created_at: Utc::now(),
        };
        accounts.insert(created.email.clone(), created.clone());
        Ok(created)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryConnector;

#[async_trait]
impl StoreConnector for MemoryConnector {
    type Handle = InMemoryAccountRepository;

    async fn connect(&self, _timeout: Duration) -> anyhow::Result<InMemoryAccountRepository> {
        Ok(InMemoryAccountRepository::new())
    }

    fn target(&self) -> String {
        "memory".into()
    }
}
