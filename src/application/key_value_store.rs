// Port to the external key-value byte store backing the history logs
use async_trait::async_trait;

/// Whole-value byte store. No partial updates and no transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;

    /// Replace the value stored under `key`
    async fn put(&self, key: &str, value: Vec<u8>) -> anyhow::Result<()>;

    /// Remove `key`; removing an absent key succeeds
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}
