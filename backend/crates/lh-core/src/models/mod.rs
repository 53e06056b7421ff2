pub mod document_metadata;
pub mod font_size;
pub mod identity;
pub mod issued_via;
pub mod preference_document;
pub mod role;
pub mod session;
pub mod source_tier;
pub mod sync_metadata;
pub mod sync_source;
pub mod theme;
