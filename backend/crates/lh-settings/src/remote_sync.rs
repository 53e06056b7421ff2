use crate::SyncUnavailable;

use std::panic::Location;

use async_trait::async_trait;
use error_location::ErrorLocation;
use lh_core::{PreferenceDocument, Session};

/// Server acknowledgement of a push
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    pub message: Option<String>,
}

/// Remote tier of the preference store.
///
/// Implementations make a single attempt per call. Retrying and coalescing
/// belong to the coordinator.
#[async_trait]
pub trait RemoteSync: Send + Sync {
    /// Fetch the user's stored document, tagged `sourceTier: server`
    async fn pull(&self, session: &Session) -> Result<PreferenceDocument, SyncUnavailable>;

    /// Store the user's document. Implementations stamp `_metadata.lastSaved`
    /// and `_metadata.userId` before sending.
    async fn push(
        &self,
        session: &Session,
        document: &PreferenceDocument,
    ) -> Result<Ack, SyncUnavailable>;
}

/// Remote tier for deployments without a settings service
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRemote;

#[async_trait]
impl RemoteSync for OfflineRemote {
    async fn pull(&self, _session: &Session) -> Result<PreferenceDocument, SyncUnavailable> {
        Err(SyncUnavailable::Offline {
            location: ErrorLocation::from(Location::caller()),
        })
    }

    async fn push(
        &self,
        _session: &Session,
        _document: &PreferenceDocument,
    ) -> Result<Ack, SyncUnavailable> {
        Err(SyncUnavailable::Offline {
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
