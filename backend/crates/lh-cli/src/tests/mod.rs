mod cli;

use lh_config::Config;

use tempfile::TempDir;

/// Config rooted in a fresh temp directory, offline, with the light-theme pin
/// disabled
pub(crate) fn test_config() -> (TempDir, Config) {
    let temp = TempDir::new().unwrap();
    let mut config = Config::load_from(temp.path()).unwrap();
    config.remote.base_url = None;
    config.auth.jwt_secret = None;
    config.auth.jwt_public_key_path = None;
    config.auth.allow_dev_fallback = true;
    config.preferences.force_light_theme = false;
    (temp, config)
}
