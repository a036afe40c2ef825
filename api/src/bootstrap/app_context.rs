use std::sync::Arc;

use crate::application::ports::account_repository::AccountRepository;
use crate::application::ports::credential_hasher::CredentialHasher;
use crate::bootstrap::config::Config;

/// Request-scoped state shared by every handler. Built once, after the store
/// bootstrap has produced a live handle.
#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    account_repo: Arc<dyn AccountRepository>,
    credential_hasher: Arc<dyn CredentialHasher>,
}

impl AppServices {
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        credential_hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            account_repo,
            credential_hasher,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn account_repo(&self) -> Arc<dyn AccountRepository> {
        self.services.account_repo.clone()
    }

    pub fn credential_hasher(&self) -> Arc<dyn CredentialHasher> {
        self.services.credential_hasher.clone()
    }
}
