use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Notification constraints
pub const MIN_CHANNEL_CAPACITY: usize = 1;
pub const MAX_CHANNEL_CAPACITY: usize = 10_000;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Per-topic buffer before slow subscribers start skipping messages
    pub channel_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl NotificationConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.channel_capacity < MIN_CHANNEL_CAPACITY
            || self.channel_capacity > MAX_CHANNEL_CAPACITY
        {
            return Err(ConfigError::config(format!(
                "notifications.channel_capacity must be {}-{}, got {}",
                MIN_CHANNEL_CAPACITY, MAX_CHANNEL_CAPACITY, self.channel_capacity
            )));
        }

        Ok(())
    }
}
