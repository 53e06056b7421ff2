use std::sync::Arc;

use lh_core::{PreferenceDocument, Session};

/// Who is signed in and the document currently in effect.
///
/// Replaced wholesale by the coordinator; readers hold an `Arc` snapshot.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub session: Option<Session>,
    /// What callers see, with read-time overrides applied
    pub document: Arc<PreferenceDocument>,
    /// The document as persisted. Edits, pushes and logout copies start
    /// from this one.
    pub stored: Arc<PreferenceDocument>,
}

impl SyncContext {
    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(Session::user_id)
    }
}
