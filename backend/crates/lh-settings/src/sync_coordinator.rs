use crate::merge_policy::{MergeWinner, merge};
use crate::{
    LookupOrigin, Notification, NotificationBus, PreferenceStore, RemoteSync, SyncContext,
    SyncResult, SyncState, SyncUnavailable,
};

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::Duration;
use lh_core::{Clock, PreferenceDocument, PreferencePatch, Session, SourceTier};
use log::{debug, info, warn};
use serde_json::Value;
use tokio::task::JoinHandle;

/// Drives login, edits and logout across the local and remote tiers.
///
/// Local writes are synchronous and authoritative; remote pushes run on
/// background tasks, at most one per user at a time. Cloning shares state.
#[derive(Clone)]
pub struct SyncCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    store: PreferenceStore,
    remote: Arc<dyn RemoteSync>,
    bus: NotificationBus,
    clock: Arc<dyn Clock>,
    /// Clock skew tolerated when resuming a stored session
    leeway_secs: AtomicU64,
    context: RwLock<Arc<SyncContext>>,
    states: Mutex<HashMap<String, SyncState>>,
    pushes: Mutex<HashMap<String, PushSlot>>,
    /// Serializes read-modify-write of the context
    mutation: Mutex<()>,
}

/// Pending push for one user. Present while a push task is running.
struct PushSlot {
    session: Session,
    latest: Arc<PreferenceDocument>,
    dirty: bool,
    task: Option<JoinHandle<()>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl SyncCoordinator {
    /// Starts anonymous, with the stored global document in effect
    pub fn new(
        store: PreferenceStore,
        remote: Arc<dyn RemoteSync>,
        bus: NotificationBus,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let context = present_context(&store, None, store.stored_lookup(None).document);

        Self {
            inner: Arc::new(Inner {
                store,
                remote,
                bus,
                clock,
                leeway_secs: AtomicU64::new(0),
                context: RwLock::new(Arc::new(context)),
                states: Mutex::new(HashMap::new()),
                pushes: Mutex::new(HashMap::new()),
                mutation: Mutex::new(()),
            }),
        }
    }

    /// Match the identity resolver's expiry leeway when resuming sessions
    pub fn with_leeway_secs(self, secs: u64) -> Self {
        self.inner.leeway_secs.store(secs, Ordering::Relaxed);
        self
    }

    pub fn current(&self) -> Arc<SyncContext> {
        self.inner.current()
    }

    pub fn state(&self, user_id: &str) -> SyncState {
        self.inner.state(user_id)
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.inner.store
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.inner.bus
    }

    /// Sign in: reconcile the stored and remote documents for the session's
    /// user and make the winner current.
    ///
    /// An unreachable remote leaves the user `Degraded` on the local copy.
    /// Only local storage failures are returned.
    pub async fn establish_identity(
        &self,
        session: Session,
    ) -> SyncResult<Arc<PreferenceDocument>> {
        let inner = &self.inner;
        let user_id = session.user_id().to_string();
        inner.set_state(&user_id, SyncState::Loading);

        let (pulled, remote_reachable) = match inner.remote.pull(&session).await {
            Ok(document) => (Some(document), true),
            Err(SyncUnavailable::Empty { .. }) => {
                debug!("No remote preferences stored for {}", user_id);
                (None, true)
            }
            Err(e) => {
                warn!("Remote preferences unavailable for {}: {}", user_id, e);
                (None, false)
            }
        };

        inner.set_state(&user_id, SyncState::Merging);

        let (context, needs_push) = {
            let _guard = lock(&inner.mutation);

            let lookup = inner.store.stored_lookup(Some(&user_id));
            let local = match lookup.origin {
                LookupOrigin::User => Some(lookup.document),
                LookupOrigin::Global if pulled.is_none() => Some(lookup.document),
                _ => None,
            };

            let merged = merge(local, pulled, &user_id);
            let needs_push = match merged.winner {
                MergeWinner::Defaults => true,
                MergeWinner::Local => remote_reachable,
                MergeWinner::Remote => false,
            };
            debug!("Login merge for {} chose {:?}", user_id, merged.winner);

            let mut stored = match merged.winner {
                MergeWinner::Local => merged.document.with_source(SourceTier::Local),
                _ => merged.document,
            };
            stored.metadata.user_id = Some(user_id.clone());

            inner.store.put(Some(&user_id), &stored)?;
            inner.store.save_current_session(Some(&session))?;

            let context = Arc::new(present_context(&inner.store, Some(session.clone()), stored));
            inner.replace_context(Arc::clone(&context));
            (context, needs_push)
        };
        let document = Arc::clone(&context.document);

        inner.set_state(
            &user_id,
            if remote_reachable {
                SyncState::Settled
            } else {
                SyncState::Degraded
            },
        );

        inner.bus.publish(Notification::IdentityChanged {
            identity: Some(session.identity.clone()),
        });
        inner.bus.publish(Notification::PreferencesChanged {
            user_id: Some(user_id.clone()),
            document: Arc::clone(&document),
        });

        if needs_push {
            self.schedule_push(session, Arc::clone(&context.stored));
        }

        info!("Established identity for {}", user_id);
        Ok(document)
    }

    /// Shallow-merge `patch` into the current document and persist it.
    ///
    /// Returns once the local write is done; the remote push (if signed in)
    /// happens in the background.
    pub fn update_preferences(
        &self,
        patch: &PreferencePatch,
    ) -> SyncResult<Arc<PreferenceDocument>> {
        let inner = &self.inner;

        let context = {
            let _guard = lock(&inner.mutation);
            let context = inner.current();
            let user_id = context.user_id();

            let stored = context
                .stored
                .apply_patch(patch)?
                .stamped(inner.clock.now(), user_id)
                .with_source(SourceTier::Local);

            inner.store.put(user_id, &stored)?;

            let updated = Arc::new(present_context(&inner.store, context.session.clone(), stored));
            inner.replace_context(Arc::clone(&updated));
            updated
        };
        let document = Arc::clone(&context.document);

        inner.bus.publish(Notification::PreferencesChanged {
            user_id: context.user_id().map(String::from),
            document: Arc::clone(&document),
        });

        if let Some(session) = &context.session {
            self.schedule_push(session.clone(), Arc::clone(&context.stored));
        }

        Ok(document)
    }

    pub fn set_preference(&self, key: &str, value: Value) -> SyncResult<Arc<PreferenceDocument>> {
        let mut patch = PreferencePatch::new();
        patch.insert(key.to_string(), value);
        self.update_preferences(&patch)
    }

    /// Sign out. The user's document is kept under both the user key and the
    /// global key so the next anonymous session starts from it.
    pub fn logout(&self) -> SyncResult<Arc<PreferenceDocument>> {
        let inner = &self.inner;

        let (session, document) = {
            let _guard = lock(&inner.mutation);
            let context = inner.current();

            let Some(session) = context.session.clone() else {
                debug!("Logout without a session");
                return Ok(Arc::clone(&context.document));
            };
            let user_id = session.user_id();

            inner.store.put(Some(user_id), &context.stored)?;

            let mut global = (*context.stored).clone();
            global.metadata.user_id = None;
            inner.store.put(None, &global)?;

            inner.store.save_current_session(None)?;

            self.schedule_push(session.clone(), Arc::clone(&context.stored));

            let document = inner.become_anonymous();
            (session, document)
        };

        inner.set_state(session.user_id(), SyncState::Idle);
        inner.bus.publish(Notification::IdentityChanged { identity: None });
        inner.bus.publish(Notification::PreferencesChanged {
            user_id: None,
            document: Arc::clone(&document),
        });

        info!("Logged out {}", session.user_id());
        Ok(document)
    }

    /// Restore the persisted session if it is still valid, otherwise start
    /// anonymous on the global document.
    pub async fn resume(&self) -> SyncResult<Arc<PreferenceDocument>> {
        let inner = &self.inner;

        let leeway = Duration::seconds(inner.leeway_secs.load(Ordering::Relaxed) as i64);

        match inner.store.load_current_session() {
            Some(session) if !session.identity.is_expired_at(inner.clock.now(), leeway) => {
                debug!("Resuming session for {}", session.user_id());
                return self.establish_identity(session).await;
            }
            Some(session) => {
                info!("Stored session for {} has expired", session.user_id());
                inner.store.save_current_session(None)?;
            }
            None => debug!("No stored session"),
        }

        let document = {
            let _guard = lock(&inner.mutation);
            inner.become_anonymous()
        };

        inner.bus.publish(Notification::PreferencesChanged {
            user_id: None,
            document: Arc::clone(&document),
        });
        Ok(document)
    }

    /// Wait for every push scheduled so far, including coalesced follow-ups
    pub async fn flush(&self) {
        loop {
            let tasks: Vec<JoinHandle<()>> = lock(&self.inner.pushes)
                .values_mut()
                .filter_map(|slot| slot.task.take())
                .collect();

            if tasks.is_empty() {
                return;
            }

            for task in tasks {
                if let Err(e) = task.await {
                    warn!("Push task ended abnormally: {}", e);
                }
            }
        }
    }

    /// Queue a push of `document`. While a push for the same user is in
    /// flight, only the newest document is kept and sent once it finishes.
    fn schedule_push(&self, session: Session, document: Arc<PreferenceDocument>) {
        let user_id = session.user_id().to_string();
        let mut pushes = lock(&self.inner.pushes);

        if let Some(slot) = pushes.get_mut(&user_id) {
            slot.session = session;
            slot.latest = document;
            slot.dirty = true;
            debug!("Coalesced push for {}", user_id);
            return;
        }

        let inner = Arc::clone(&self.inner);
        let task_user_id = user_id.clone();
        let task = tokio::spawn(async move { inner.drain_pushes(task_user_id).await });

        pushes.insert(
            user_id,
            PushSlot {
                session,
                latest: document,
                dirty: false,
                task: Some(task),
            },
        );
    }
}

impl Inner {
    fn current(&self) -> Arc<SyncContext> {
        Arc::clone(&self.context.read().unwrap_or_else(|e| e.into_inner()))
    }

    fn replace_context(&self, context: Arc<SyncContext>) {
        *self.context.write().unwrap_or_else(|e| e.into_inner()) = context;
    }

    /// Switch to the stored global document with no session. Callers hold
    /// the mutation lock.
    fn become_anonymous(&self) -> Arc<PreferenceDocument> {
        let context = present_context(&self.store, None, self.store.stored_lookup(None).document);
        let document = Arc::clone(&context.document);
        self.replace_context(Arc::new(context));
        document
    }

    fn set_state(&self, user_id: &str, state: SyncState) {
        let previous = lock(&self.states).insert(user_id.to_string(), state);

        if previous != Some(state) {
            debug!("Sync state for {} -> {}", user_id, state);
            self.bus.publish(Notification::SyncStateChanged {
                user_id: user_id.to_string(),
                state,
            });
        }
    }

    fn state(&self, user_id: &str) -> SyncState {
        lock(&self.states).get(user_id).copied().unwrap_or_default()
    }

    async fn drain_pushes(&self, user_id: String) {
        loop {
            let (session, document) = {
                let mut pushes = lock(&self.pushes);
                let Some(slot) = pushes.get_mut(&user_id) else {
                    return;
                };
                slot.dirty = false;
                (slot.session.clone(), Arc::clone(&slot.latest))
            };

            match self.remote.push(&session, &document).await {
                Ok(_) => {
                    debug!("Remote copy updated for {}", user_id);
                    if self.state(&user_id) == SyncState::Degraded {
                        self.set_state(&user_id, SyncState::Settled);
                    }
                }
                Err(e) => {
                    warn!("Push for {} failed: {}", user_id, e);
                    if self.state(&user_id) != SyncState::Idle {
                        self.set_state(&user_id, SyncState::Degraded);
                    }
                }
            }

            let finished = {
                let mut pushes = lock(&self.pushes);
                let dirty = pushes.get(&user_id).is_some_and(|slot| slot.dirty);
                if !dirty {
                    pushes.remove(&user_id);
                }
                !dirty
            };

            if finished {
                return;
            }
        }
    }
}

fn present_context(
    store: &PreferenceStore,
    session: Option<Session>,
    stored: PreferenceDocument,
) -> SyncContext {
    SyncContext {
        session,
        document: Arc::new(store.present(stored.clone())),
        stored: Arc::new(stored),
    }
}
