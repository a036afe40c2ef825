use std::fmt;

use tracing::{debug, info, warn};

use crate::application::ports::account_repository::{AccountRepository, InsertError};
use crate::application::ports::credential_hasher::CredentialHasher;
use crate::application::use_cases::auth::validation::{ValidationErrors, validate_registration};
use crate::domain::accounts::account::{AccountView, NewAccount};

pub struct Register<'a, R, H>
where
    R: AccountRepository + ?Sized,
    H: CredentialHasher + ?Sized,
{
    pub repo: &'a R,
    pub hasher: &'a H,
}

#[derive(Clone, Default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub credential: Option<String>,
    pub display_name: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("display_name", &self.display_name)
            .finish()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RegisterError {
    #[error("validation failed")]
    Validation(ValidationErrors),
    #[error("an account with this email already exists")]
    Conflict,
    #[error("failed to hash credential")]
    Hashing(#[source] anyhow::Error),
    #[error("failed to access account store")]
    Storage(#[source] anyhow::Error),
}

impl<'a, R, H> Register<'a, R, H>
where
    R: AccountRepository + ?Sized,
    H: CredentialHasher + ?Sized,
{
    pub async fn execute(&self, req: &RegisterRequest) -> Result<AccountView, RegisterError> {
        let valid = validate_registration(
            req.email.as_deref(),
            req.credential.as_deref(),
            req.display_name.as_deref(),
        )
        .map_err(|errors| {
            info!(stage = "validate", fields = ?errors.fields(), "register_rejected");
            RegisterError::Validation(errors)
        })?;
        debug!(stage = "validate", email = %valid.email, "register_stage_ok");

        // Fast path only; the store's unique constraint is authoritative.
        let existing = self
            .repo
            .find_by_email(&valid.email)
            .await
            .map_err(|e| {
                warn!(stage = "uniqueness", error = ?e, "register_lookup_failed");
                RegisterError::Storage(e)
            })?;
        if existing.is_some() {
            info!(stage = "uniqueness", email = %valid.email, "register_conflict");
            return Err(RegisterError::Conflict);
        }
        debug!(stage = "uniqueness", email = %valid.email, "register_stage_ok");

        let credential_hash = self.hasher.hash(valid.credential).await.map_err(|e| {
            warn!(stage = "hash", error = ?e, "register_hash_failed");
            RegisterError::Hashing(e)
        })?;
        if credential_hash.is_empty() || credential_hash == valid.credential {
            warn!(stage = "hash", "register_hash_unusable");
            return Err(RegisterError::Hashing(anyhow::anyhow!(
                "hasher returned an unusable digest"
            )));
        }
        debug!(stage = "hash", "register_stage_ok");

        let new_account = NewAccount {
            email: valid.email,
            credential_hash,
            display_name: valid.display_name,
        };
        before_persist(&new_account);

        let account = match self.repo.insert(new_account).await {
            Ok(account) => account,
            Err(InsertError::Duplicate) => {
                info!(stage = "persist", "register_conflict_on_insert");
                return Err(RegisterError::Conflict);
            }
            Err(InsertError::Other(e)) => {
                warn!(stage = "persist", error = ?e, "register_insert_failed");
                return Err(RegisterError::Storage(e));
            }
        };
        info!(stage = "persist", account_id = %account.id, "account_registered");

        Ok(account.into_view())
    }
}

fn before_persist(account: &NewAccount) {
    info!(stage = "pre_persist", email = %account.email, "saving_account");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::accounts::account::Account;
    use crate::infrastructure::crypto::Argon2CredentialHasher;
    use crate::infrastructure::db::repositories::account_repository_memory::InMemoryAccountRepository;

    fn request(email: Option<&str>, credential: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            email: email.map(str::to_string),
            credential: credential.map(str::to_string),
            display_name: None,
        }
    }

    async fn register(
        repo: &InMemoryAccountRepository,
        req: &RegisterRequest,
    ) -> Result<AccountView, RegisterError> {
        let hasher = Argon2CredentialHasher::lightweight();
        Register {
            repo,
            hasher: &hasher,
        }
        .execute(req)
        .await
    }

    #[tokio::test]
    async fn registers_with_normalized_email_and_default_name() {
        let repo = InMemoryAccountRepository::new();
        let view = register(&repo, &request(Some("A@Test.com"), Some("secret1")))
            .await
            .unwrap();
        assert_eq!(view.email, "a@test.com");
        assert_eq!(view.display_name, "a");

        let stored = repo.find_by_email("a@test.com").await.unwrap().unwrap();
        assert_eq!(stored.id, view.id);
        assert_ne!(stored.credential_hash, "secret1");
        assert!(stored.credential_hash.starts_with("$argon2id$"));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_case_insensitively() {
        let repo = InMemoryAccountRepository::new();
        register(&repo, &request(Some("A@Test.com"), Some("secret1")))
            .await
            .unwrap();
        let original = repo.find_by_email("a@test.com").await.unwrap().unwrap();

        for email in ["a@test.com", "A@TEST.COM", " a@Test.com "] {
            let err = register(&repo, &request(Some(email), Some("another1")))
                .await
                .unwrap_err();
            assert!(matches!(err, RegisterError::Conflict));
        }

        assert_eq!(repo.len().await, 1);
        let after = repo.find_by_email("a@test.com").await.unwrap().unwrap();
        assert_eq!(after.credential_hash, original.credential_hash);
    }

    #[tokio::test]
    async fn missing_fields_fail_before_store_access() {
        let repo = InMemoryAccountRepository::new();
        let err = register(&repo, &request(None, Some("x"))).await.unwrap_err();
        match err {
            RegisterError::Validation(errors) => {
                assert!(errors.missing_fields().contains(&"email"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let err = register(&repo, &request(Some("b@test.com"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, RegisterError::Validation(_)));
        assert_eq!(repo.store_accesses(), 0);
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn explicit_display_name_is_kept() {
        let repo = InMemoryAccountRepository::new();
        let mut req = request(Some("jo@example.com"), Some("secret1"));
        req.display_name = Some("Jo".into());
        let view = register(&repo, &req).await.unwrap();
        assert_eq!(view.display_name, "Jo");
    }

    /// Lookup misses, insert reports a duplicate: a concurrent registration
    /// won the race.
    struct RacingRepo {
        insert_error: fn() -> InsertError,
        inserts: AtomicUsize,
    }

    #[async_trait]
    impl AccountRepository for RacingRepo {
        async fn find_by_email(&self, _email: &str) -> anyhow::Result<Option<Account>> {
            Ok(None)
        }

        async fn insert(&self, _account: NewAccount) -> Result<Account, InsertError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            Err((self.insert_error)())
        }

        async fn ping(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn store_duplicate_is_reported_as_conflict() {
        let repo = RacingRepo {
            insert_error: || InsertError::Duplicate,
            inserts: AtomicUsize::new(0),
        };
        let hasher = Argon2CredentialHasher::lightweight();
        let err = Register {
            repo: &repo,
            hasher: &hasher,
        }
        .execute(&request(Some("race@test.com"), Some("secret1")))
        .await
        .unwrap_err();
        assert!(matches!(err, RegisterError::Conflict));
        assert_eq!(repo.inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn other_store_failures_are_storage_errors() {
        let repo = RacingRepo {
            insert_error: || InsertError::Other(anyhow::anyhow!("connection reset")),
            inserts: AtomicUsize::new(0),
        };
        let hasher = Argon2CredentialHasher::lightweight();
        let err = Register {
            repo: &repo,
            hasher: &hasher,
        }
        .execute(&request(Some("down@test.com"), Some("secret1")))
        .await
        .unwrap_err();
        assert!(matches!(err, RegisterError::Storage(_)));
    }

    struct EchoHasher;

    #[async_trait]
    impl CredentialHasher for EchoHasher {
        async fn hash(&self, plaintext: &str) -> anyhow::Result<String> {
            Ok(plaintext.to_string())
        }

        async fn verify(&self, plaintext: &str, hash: &str) -> anyhow::Result<bool> {
            Ok(plaintext == hash)
        }

        async fn verify_decoy(&self, _plaintext: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn refuses_to_store_plaintext() {
        let repo = InMemoryAccountRepository::new();
        let err = Register {
            repo: &repo,
            hasher: &EchoHasher,
        }
        .execute(&request(Some("plain@test.com"), Some("secret1")))
        .await
        .unwrap_err();
        assert!(matches!(err, RegisterError::Hashing(_)));
        assert_eq!(repo.len().await, 0);
    }

    #[test]
    fn request_debug_redacts_credential() {
        let dbg = format!("{:?}", request(Some("a@b.co"), Some("hunter22")));
        assert!(!dbg.contains("hunter22"));
        assert!(dbg.contains("<redacted>"));
    }
}
