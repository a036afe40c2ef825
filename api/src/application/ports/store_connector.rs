use std::time::Duration;

use async_trait::async_trait;

/// Opens a handle to the backing store. Each call is one connection attempt;
/// retrying is the caller's job.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    type Handle: Send;

    async fn connect(&self, timeout: Duration) -> anyhow::Result<Self::Handle>;

    /// Human-readable target for logs. Must not include credentials.
    fn target(&self) -> String;
}
