use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use async_trait::async_trait;

use crate::application::ports::credential_hasher::CredentialHasher;

const DECOY_SALT: &str = "ZGVjb3ktc2FsdC12YWx1ZQ";

/// Argon2id with a fixed work factor. Hashing runs on the blocking pool so a
/// slow hash never stalls other requests.
#[derive(Debug, Clone)]
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cheap parameters so tests don't spend seconds per hash.
    #[cfg(test)]
    pub(crate) fn lightweight() -> Self {
        Self {
            params: Params::new(1024, 1, 1, None).expect("valid argon2 params"),
        }
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, plaintext: &str) -> anyhow::Result<String> {
        let params = self.params.clone();
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || -> anyhow::Result<String> {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(plaintext.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| anyhow::anyhow!("hash failed: {}", e))
        })
        .await?
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> anyhow::Result<bool> {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || -> anyhow::Result<bool> {
            let parsed =
                PasswordHash::new(&hash).map_err(|e| anyhow::anyhow!("invalid hash: {}", e))?;
            // Parameters come from the PHC string, not from `self`.
            match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(e) => Err(anyhow::anyhow!("verify failed: {}", e)),
            }
        })
        .await?
    }

    async fn verify_decoy(&self, plaintext: &str) -> anyhow::Result<()> {
        let params = self.params.clone();
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let salt = SaltString::from_b64(DECOY_SALT)
                .map_err(|e| anyhow::anyhow!("invalid decoy salt: {}", e))?;
            Self::argon2(params)
                .hash_password(plaintext.as_bytes(), &salt)
                .map_err(|e| anyhow::anyhow!("decoy hash failed: {}", e))?;
            Ok(())
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_are_salted_and_verifiable() {
        let hasher = Argon2CredentialHasher::lightweight();
        let a = hasher.hash("secret1").await.unwrap();
        let b = hasher.hash("secret1").await.unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("secret1"));
        assert!(hasher.verify("secret1", &a).await.unwrap());
        assert!(!hasher.verify("secret2", &a).await.unwrap());
    }

    #[tokio::test]
    async fn decoy_verification_succeeds_for_any_input() {
        let hasher = Argon2CredentialHasher::lightweight();
        hasher.verify_decoy("whatever").await.unwrap();
        hasher.verify_decoy("").await.unwrap();
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let hasher = Argon2CredentialHasher::lightweight();
        assert!(hasher.verify("secret1", "not-a-phc-string").await.is_err());
    }

    #[test]
    fn production_work_factor_is_fixed() {
        let hasher = Argon2CredentialHasher::new();
        assert_eq!(hasher.params.m_cost(), Params::DEFAULT_M_COST);
        assert_eq!(hasher.params.t_cost(), Params::DEFAULT_T_COST);
        assert_eq!(hasher.params.p_cost(), Params::DEFAULT_P_COST);
    }
}
