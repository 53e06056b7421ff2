use serde::{Deserialize, Serialize};

/// Per-user progress of the sync state machine.
///
/// `Idle -> Loading -> Merging -> Settled`, with `Degraded` when the remote
/// tier could not be reached and the local copy is authoritative for now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    #[default]
    Idle,
    Loading,
    Merging,
    Settled,
    Degraded,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Idle => "idle",
            SyncState::Loading => "loading",
            SyncState::Merging => "merging",
            SyncState::Settled => "settled",
            SyncState::Degraded => "degraded",
        }
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
