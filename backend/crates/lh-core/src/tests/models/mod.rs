mod identity;
mod preference_document;
mod role;
