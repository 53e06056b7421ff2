use crate::storage_keys::{CURRENT_IDENTITY_KEY, GLOBAL_SETTINGS_KEY, settings_key, user_settings_key};
use crate::{StorageBackend, StoreError, StoreResult};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::{Arc, Mutex};

use error_location::ErrorLocation;
use lh_core::{Clock, PreferenceDocument, Session, SyncMetadata, SyncSource, Theme};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where [`PreferenceStore::lookup`] found the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOrigin {
    User,
    Global,
    Defaults,
}

#[derive(Debug, Clone)]
pub struct Lookup {
    pub document: PreferenceDocument,
    pub origin: LookupOrigin,
}

/// On-disk form of a stored document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    document: Map<String, Value>,
    sync: SyncMetadata,
}

/// Synchronous local tier: an in-memory cache in front of a
/// [`StorageBackend`].
///
/// Reads never fail. A missing, unreadable or malformed entry falls through
/// to the next candidate (user, then global, then built-in defaults).
pub struct PreferenceStore {
    backend: Arc<dyn StorageBackend>,
    cache: Mutex<HashMap<String, StoredEntry>>,
    clock: Arc<dyn Clock>,
    force_light_theme: bool,
}

impl PreferenceStore {
    pub fn new(backend: Arc<dyn StorageBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            cache: Mutex::new(HashMap::new()),
            clock,
            force_light_theme: true,
        }
    }

    /// Whether reads pin `theme` to `light`. On by default.
    pub fn with_light_theme_override(mut self, enabled: bool) -> Self {
        self.force_light_theme = enabled;
        self
    }

    pub fn get(&self, user_id: Option<&str>) -> PreferenceDocument {
        self.lookup(user_id).document
    }

    pub fn lookup(&self, user_id: Option<&str>) -> Lookup {
        let lookup = self.stored_lookup(user_id);
        Lookup {
            document: self.present(lookup.document),
            origin: lookup.origin,
        }
    }

    /// [`lookup`](Self::lookup) without read-time overrides, for callers that
    /// merge or persist the result
    pub fn stored_lookup(&self, user_id: Option<&str>) -> Lookup {
        let found = user_id
            .and_then(|user_id| self.document(&user_settings_key(user_id)))
            .map(|document| (document, LookupOrigin::User))
            .or_else(|| {
                self.document(GLOBAL_SETTINGS_KEY)
                    .map(|document| (document, LookupOrigin::Global))
            });

        let (document, origin) =
            found.unwrap_or_else(|| (PreferenceDocument::defaults(), LookupOrigin::Defaults));

        Lookup { document, origin }
    }

    /// Persist a document, shallow-merged over whatever is stored for the
    /// same key so fields absent from `document` survive.
    #[track_caller]
    pub fn put(&self, user_id: Option<&str>, document: &PreferenceDocument) -> StoreResult<()> {
        let key = settings_key(user_id);
        let prior = self.entry(&key).map(|entry| entry.document).unwrap_or_default();

        let entry = StoredEntry {
            document: document.merged_over(&prior),
            sync: SyncMetadata {
                last_updated: self.clock.now(),
                source: SyncSource::from(document.source_tier()),
            },
        };

        let serialized = serde_json::to_string(&entry).map_err(|e| StoreError::Serialize {
            key: key.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.backend.write(&key, &serialized)?;
        debug!("Stored preferences under '{}'", key);

        self.lock_cache().insert(key, entry);
        Ok(())
    }

    /// Bookkeeping for exactly this key (no fallback to global)
    pub fn sync_metadata(&self, user_id: Option<&str>) -> Option<SyncMetadata> {
        self.entry(&settings_key(user_id)).map(|entry| entry.sync)
    }

    /// Remember the signed-in session; `None` records a signed-out state
    #[track_caller]
    pub fn save_current_session(&self, session: Option<&Session>) -> StoreResult<()> {
        let serialized = serde_json::to_string(&session).map_err(|e| StoreError::Serialize {
            key: CURRENT_IDENTITY_KEY.to_string(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;
        self.backend.write(CURRENT_IDENTITY_KEY, &serialized)
    }

    pub fn load_current_session(&self) -> Option<Session> {
        let raw = match self.backend.read(CURRENT_IDENTITY_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Could not read stored session: {}", e);
                return None;
            }
        };

        serde_json::from_str::<Option<Session>>(&raw).unwrap_or_else(|e| {
            warn!("Ignoring malformed stored session: {}", e);
            None
        })
    }

    /// Apply read-time overrides (the light theme pin). The result is for
    /// display only and must not be stored or pushed.
    pub fn present(&self, mut document: PreferenceDocument) -> PreferenceDocument {
        if self.force_light_theme {
            document.theme = Theme::Light;
            document.extra.remove("theme");
        }
        document
    }

    fn document(&self, key: &str) -> Option<PreferenceDocument> {
        let entry = self.entry(key)?;
        let document = PreferenceDocument::from_object(entry.document);

        let unrecognized = document.unrecognized_settings();
        if !unrecognized.is_empty() {
            warn!(
                "Preferences under '{}' hold unreadable values for {:?}; using defaults",
                key, unrecognized
            );
        }
        Some(document)
    }

    fn entry(&self, key: &str) -> Option<StoredEntry> {
        if let Some(entry) = self.lock_cache().get(key) {
            return Some(entry.clone());
        }

        let raw = match self.backend.read(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Could not read '{}' from local storage: {}", key, e);
                return None;
            }
        };

        let entry = self.parse_entry(key, &raw)?;
        self.lock_cache().insert(key.to_string(), entry.clone());
        Some(entry)
    }

    /// Accepts the `{document, sync}` envelope, or a bare document object
    /// written by older clients (tagged `migrated-legacy`).
    fn parse_entry(&self, key: &str, raw: &str) -> Option<StoredEntry> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Skipping unreadable preferences under '{}': {}", key, e);
                return None;
            }
        };

        if let Ok(entry) = serde_json::from_value::<StoredEntry>(value.clone()) {
            return Some(entry);
        }

        match value {
            Value::Object(document) => {
                debug!("Migrating legacy preferences under '{}'", key);
                let last_updated = PreferenceDocument::from_object(document.clone())
                    .last_saved()
                    .unwrap_or_else(|| self.clock.now());
                Some(StoredEntry {
                    document,
                    sync: SyncMetadata {
                        last_updated,
                        source: SyncSource::MigratedLegacy,
                    },
                })
            }
            _ => {
                warn!("Skipping non-object preferences under '{}'", key);
                None
            }
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredEntry>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}
