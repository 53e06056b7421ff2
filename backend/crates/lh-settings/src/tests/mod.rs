
use crate::{Ack, MemoryStorage, PreferenceStore, RemoteSync, SyncUnavailable};

use std::panic::Location;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use error_location::ErrorLocation;
use lh_core::{Identity, IssuedVia, ManualClock, PreferenceDocument, Role, Session};
use tokio::sync::{Notify, Semaphore};

pub(crate) const NOW_SECS: i64 = 1_800_000_000;

pub(crate) fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub(crate) fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(at(NOW_SECS)))
}

pub(crate) fn session(user_id: &str) -> Session {
    Session::new(
        Identity {
            user_id: user_id.to_string(),
            username: Some("jane".to_string()),
            role: Role::User,
            issued_via: IssuedVia::Simplified,
            expires_at: None,
        },
        format!("{}:jane:user", user_id),
    )
}

/// Store over fresh memory storage, without the light-theme pin so theme
/// values survive reads
pub(crate) fn store(clock: Arc<ManualClock>) -> (Arc<MemoryStorage>, PreferenceStore) {
    let backend = Arc::new(MemoryStorage::new());
    let store = PreferenceStore::new(backend.clone(), clock).with_light_theme_override(false);
    (backend, store)
}

pub(crate) enum PullScript {
    Document(PreferenceDocument),
    Empty,
    Unavailable,
}

/// In-process [`RemoteSync`] that records pushes and can hold them until
/// released
pub(crate) struct ScriptedRemote {
    pull: Mutex<PullScript>,
    pushed: Mutex<Vec<PreferenceDocument>>,
    push_calls: AtomicUsize,
    fail_pushes: AtomicBool,
    gated: bool,
    gate: Semaphore,
    push_started: Notify,
}

impl ScriptedRemote {
    pub(crate) fn new(pull: PullScript) -> Self {
        Self {
            pull: Mutex::new(pull),
            pushed: Mutex::new(Vec::new()),
            push_calls: AtomicUsize::new(0),
            fail_pushes: AtomicBool::new(false),
            gated: false,
            gate: Semaphore::new(0),
            push_started: Notify::new(),
        }
    }

    /// Pushes block until [`open_gate`](Self::open_gate)
    pub(crate) fn gated(pull: PullScript) -> Self {
        Self {
            gated: true,
            ..Self::new(pull)
        }
    }

    pub(crate) fn open_gate(&self) {
        self.gate.add_permits(1024);
    }

    pub(crate) async fn wait_for_push_start(&self) {
        self.push_started.notified().await;
    }

    pub(crate) fn set_pull(&self, pull: PullScript) {
        *self.pull.lock().unwrap() = pull;
    }

    pub(crate) fn set_fail_pushes(&self, fail: bool) {
        self.fail_pushes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn push_calls(&self) -> usize {
        self.push_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn pushed(&self) -> Vec<PreferenceDocument> {
        self.pushed.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteSync for ScriptedRemote {
    async fn pull(&self, _session: &Session) -> Result<PreferenceDocument, SyncUnavailable> {
        match &*self.pull.lock().unwrap() {
            PullScript::Document(document) => Ok(document.clone()),
            PullScript::Empty => Err(SyncUnavailable::Empty {
                location: ErrorLocation::from(Location::caller()),
            }),
            PullScript::Unavailable => Err(SyncUnavailable::Status {
                status: 503,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    async fn push(
        &self,
        _session: &Session,
        document: &PreferenceDocument,
    ) -> Result<Ack, SyncUnavailable> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        self.pushed.lock().unwrap().push(document.clone());
        self.push_started.notify_one();

        if self.gated {
            self.gate.acquire().await.unwrap().forget();
        }

        if self.fail_pushes.load(Ordering::SeqCst) {
            return Err(SyncUnavailable::Transport {
                message: "connection refused".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(Ack::default())
    }
}
