use serde::Deserialize;

pub const DEFAULT_FORCE_LIGHT_THEME: bool = true;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// Pin `theme` to `light` on every read
    pub force_light_theme: bool,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            force_light_theme: DEFAULT_FORCE_LIGHT_THEME,
        }
    }
}
