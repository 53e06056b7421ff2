use crate::SourceTier;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `_metadata` block carried inside every preference document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub source_tier: SourceTier,
}
