pub mod clock;
pub mod error;
pub mod models;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, Result};
pub use models::document_metadata::DocumentMetadata;
pub use models::font_size::FontSize;
pub use models::identity::Identity;
pub use models::issued_via::IssuedVia;
pub use models::preference_document::{PreferenceDocument, PreferencePatch};
pub use models::role::Role;
pub use models::session::Session;
pub use models::source_tier::SourceTier;
pub use models::sync_metadata::SyncMetadata;
pub use models::sync_source::SyncSource;
pub use models::theme::Theme;

#[cfg(test)]
mod tests;
