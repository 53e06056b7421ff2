pub mod error;
pub mod file_storage;
pub mod http_remote_sync;
pub mod memory_storage;
pub mod merge_policy;
pub mod notification;
pub mod notification_bus;
pub mod preference_store;
pub mod remote_sync;
pub mod storage_backend;
pub mod storage_keys;
pub mod sync_context;
pub mod sync_coordinator;
pub mod sync_state;

pub use error::{StoreError, StoreResult, SyncError, SyncResult, SyncUnavailable};
pub use file_storage::FileStorage;
pub use http_remote_sync::HttpRemoteSync;
pub use memory_storage::MemoryStorage;
pub use merge_policy::{MergeWinner, Merged, merge};
pub use notification::{Notification, Topic};
pub use notification_bus::{NotificationBus, Subscription};
pub use preference_store::{Lookup, LookupOrigin, PreferenceStore};
pub use remote_sync::{Ack, OfflineRemote, RemoteSync};
pub use storage_backend::StorageBackend;
pub use sync_context::SyncContext;
pub use sync_coordinator::SyncCoordinator;
pub use sync_state::SyncState;

#[cfg(test)]
mod tests;
