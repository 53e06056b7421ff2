use crate::SyncState;

use std::sync::Arc;

use lh_core::{Identity, PreferenceDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Preferences,
    Identity,
    SyncState,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Preferences => "preferences",
            Topic::Identity => "identity",
            Topic::SyncState => "sync-state",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Change events published on the [`NotificationBus`](crate::NotificationBus)
#[derive(Debug, Clone)]
pub enum Notification {
    PreferencesChanged {
        user_id: Option<String>,
        document: Arc<PreferenceDocument>,
    },
    /// `None` after logout
    IdentityChanged { identity: Option<Identity> },
    SyncStateChanged { user_id: String, state: SyncState },
}

impl Notification {
    pub fn topic(&self) -> Topic {
        match self {
            Notification::PreferencesChanged { .. } => Topic::Preferences,
            Notification::IdentityChanged { .. } => Topic::Identity,
            Notification::SyncStateChanged { .. } => Topic::SyncState,
        }
    }
}
