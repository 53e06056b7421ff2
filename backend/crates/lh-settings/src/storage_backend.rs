use crate::StoreResult;

/// Durable key/value storage under the preference store.
///
/// There is no delete: nothing in the sync flow may remove a stored document.
pub trait StorageBackend: Send + Sync {
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    fn write(&self, key: &str, value: &str) -> StoreResult<()>;
}
