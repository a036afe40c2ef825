use async_trait::async_trait;

/// One-way credential hashing. Implementations must salt every hash and must
/// not block the async executor while computing it.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> anyhow::Result<String>;
    async fn verify(&self, plaintext: &str, hash: &str) -> anyhow::Result<bool>;

    /// Performs the same work as a failed [`verify`](Self::verify) without a
    /// stored hash, so lookups of unknown accounts cost as much as real ones.
    async fn verify_decoy(&self, plaintext: &str) -> anyhow::Result<()>;
}
