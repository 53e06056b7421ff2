use error_location::ErrorLocation;

use std::result::Result as StdResult;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid role: {value} {location}")]
    InvalidRole {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid setting '{key}': {message} {location}")]
    InvalidSetting {
        key: String,
        message: String,
        location: ErrorLocation,
    },
}

pub type Result<T> = StdResult<T, CoreError>;
