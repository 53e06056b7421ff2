use crate::{CoreError, DocumentMetadata, FontSize, Result as CoreErrorResult, SourceTier, Theme};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const METADATA_KEY: &str = "_metadata";

const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_ITEMS_PER_PAGE: u32 = 20;

/// Shallow set of setting changes, keyed by wire name (`"fontSize"`, ...)
pub type PreferencePatch = Map<String, Value>;

/// A user's (or the global) settings bundle.
///
/// Known settings are typed fields; anything else the server or an older
/// client stored is kept in `extra` and written back untouched. Missing keys
/// deserialize to built-in defaults, so a document is always complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferenceDocument {
    pub theme: Theme,
    pub language: String,
    pub font_size: FontSize,
    pub autoplay_videos: bool,
    pub show_progress: bool,
    pub email_notifications: bool,
    pub items_per_page: u32,
    #[serde(rename = "_metadata")]
    pub metadata: DocumentMetadata,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PreferenceDocument {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: String::from(DEFAULT_LANGUAGE),
            font_size: FontSize::default(),
            autoplay_videos: true,
            show_progress: true,
            email_notifications: false,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            metadata: DocumentMetadata::default(),
            extra: Map::new(),
        }
    }
}

impl PreferenceDocument {
    /// Built-in defaults, tagged with `sourceTier: default`
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Parse a stored or received JSON object.
    ///
    /// A known setting holding a value this build cannot represent (a newer
    /// theme name, a numeric string) keeps its default and the raw value is
    /// carried in `extra`, so it is written back unchanged. A malformed
    /// `_metadata` block is dropped.
    pub fn from_object(object: Map<String, Value>) -> Self {
        let mut accepted = Map::new();
        let mut unrecognized = Map::new();

        for (key, value) in object {
            match Self::check_setting(&key, &value) {
                Ok(()) => {
                    accepted.insert(key, value);
                }
                Err(_) if key == METADATA_KEY => {}
                Err(_) => {
                    unrecognized.insert(key, value);
                }
            }
        }

        let mut document: Self = serde_json::from_value(Value::Object(accepted)).unwrap_or_default();
        document.extra.extend(unrecognized);
        document
    }

    /// Known settings whose stored value could not be read, as carried in
    /// `extra`
    pub fn unrecognized_settings(&self) -> Vec<&str> {
        self.extra
            .iter()
            .filter(|(key, value)| Self::check_setting(key, value).is_err())
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Whether `value` is acceptable for `key` on its own. Keys that are not
    /// typed settings accept anything.
    fn check_setting(key: &str, value: &Value) -> Result<(), serde_json::Error> {
        let mut single = Map::new();
        single.insert(key.to_string(), value.clone());
        serde_json::from_value::<Self>(Value::Object(single)).map(|_| ())
    }

    /// JSON object form, as stored locally and sent to the server
    pub fn to_object(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(object)) => object,
            _ => Map::new(),
        }
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.metadata.last_saved
    }

    pub fn source_tier(&self) -> SourceTier {
        self.metadata.source_tier
    }

    pub fn with_source(mut self, tier: SourceTier) -> Self {
        self.metadata.source_tier = tier;
        self
    }

    /// Stamp save time and owner
    pub fn stamped(mut self, now: DateTime<Utc>, user_id: Option<&str>) -> Self {
        self.metadata.last_saved = Some(now);
        if let Some(user_id) = user_id {
            self.metadata.user_id = Some(user_id.to_string());
        }
        self
    }

    /// True when every setting (ignoring `_metadata`) matches built-in defaults
    pub fn has_default_settings(&self) -> bool {
        let mut mine = self.to_object();
        let mut defaults = Self::defaults().to_object();
        mine.remove(METADATA_KEY);
        defaults.remove(METADATA_KEY);
        mine == defaults
    }

    /// Apply a shallow patch and return the new document.
    ///
    /// `_metadata` entries in the patch are ignored. A value of the wrong
    /// shape for a known setting rejects the whole patch.
    #[track_caller]
    pub fn apply_patch(&self, patch: &PreferencePatch) -> CoreErrorResult<Self> {
        let changes = patch.iter().filter(|(key, _)| key.as_str() != METADATA_KEY);

        let mut merged = self.to_object();
        for (key, value) in changes {
            Self::check_setting(key, value).map_err(|e| CoreError::InvalidSetting {
                key: key.clone(),
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;
            merged.insert(key.clone(), value.clone());
        }

        Ok(Self::from_object(merged))
    }

    /// Shallow-merge this document over a previously stored object, keeping
    /// keys the prior object has and this one lacks.
    pub fn merged_over(&self, prior: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = prior.clone();
        for (key, value) in self.to_object() {
            merged.insert(key, value);
        }
        merged
    }
}
