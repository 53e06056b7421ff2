//! Logical keys of the local persisted state.

pub const CURRENT_IDENTITY_KEY: &str = "currentIdentity";
pub const GLOBAL_SETTINGS_KEY: &str = "settings:global";

const USER_SETTINGS_PREFIX: &str = "settings:user:";

pub fn user_settings_key(user_id: &str) -> String {
    format!("{}{}", USER_SETTINGS_PREFIX, user_id)
}

/// Settings key for a user, or the global key when anonymous
pub fn settings_key(user_id: Option<&str>) -> String {
    match user_id {
        Some(user_id) => user_settings_key(user_id),
        None => GLOBAL_SETTINGS_KEY.to_string(),
    }
}
