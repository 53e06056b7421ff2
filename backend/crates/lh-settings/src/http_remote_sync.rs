use crate::{Ack, RemoteSync, SyncUnavailable};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use error_location::ErrorLocation;
use lh_core::{Clock, PreferenceDocument, Session, SourceTier};
use log::{debug, warn};
use reqwest::{Client as ReqwestClient, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const GET_SETTINGS_PATH: &str = "/get-user-settings";
const SAVE_SETTINGS_PATH: &str = "/save-user-settings";

#[derive(Debug, Deserialize)]
struct GetSettingsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    settings: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SaveSettingsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveSettingsRequest<'a> {
    user_id: &'a str,
    settings: &'a Map<String, Value>,
}

/// [`RemoteSync`] over the settings HTTP API
pub struct HttpRemoteSync {
    pub base_url: String,
    client: ReqwestClient,
    clock: Arc<dyn Clock>,
}

impl HttpRemoteSync {
    /// # Arguments
    /// * `base_url` - API root (e.g., "http://127.0.0.1:5000/api")
    /// * `timeout` - Per-request timeout; the only timeout in the sync path
    #[track_caller]
    pub fn new(
        base_url: &str,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SyncUnavailable> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncUnavailable::Transport {
                message: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            clock,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[track_caller]
    fn require_user_id(session: &Session) -> Result<&str, SyncUnavailable> {
        let user_id = session.user_id();
        if user_id.is_empty() {
            return Err(SyncUnavailable::MissingUserId {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(user_id)
    }

    /// Map transport failures and non-2xx statuses
    #[track_caller]
    fn check_status(
        result: Result<Response, reqwest::Error>,
    ) -> Result<Response, SyncUnavailable> {
        let response = result.map_err(|e| SyncUnavailable::Transport {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncUnavailable::Status {
                status: status.as_u16(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(response)
    }

    #[track_caller]
    fn malformed(message: impl Into<String>) -> SyncUnavailable {
        SyncUnavailable::MalformedResponse {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

#[async_trait]
impl RemoteSync for HttpRemoteSync {
    async fn pull(&self, session: &Session) -> Result<PreferenceDocument, SyncUnavailable> {
        let user_id = Self::require_user_id(session)?;

        let result = self
            .client
            .get(self.url(GET_SETTINGS_PATH))
            .bearer_auth(&session.credential)
            .send()
            .await;
        let response = Self::check_status(result)?;

        let body: GetSettingsResponse = response
            .json()
            .await
            .map_err(|e| Self::malformed(e.to_string()))?;

        if !body.success {
            return Err(SyncUnavailable::Rejected {
                message: "server reported success=false".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let settings = match body.settings {
            Some(Value::Object(settings)) if settings.is_empty() => {
                return Err(SyncUnavailable::Empty {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Some(Value::Object(settings)) => settings,
            Some(_) => return Err(Self::malformed("settings is not an object")),
            None => return Err(Self::malformed("settings field missing")),
        };

        let document = PreferenceDocument::from_object(settings).with_source(SourceTier::Server);
        let unrecognized = document.unrecognized_settings();
        if !unrecognized.is_empty() {
            warn!(
                "Remote preferences for {} hold unreadable values for {:?}; using defaults",
                user_id, unrecognized
            );
        }

        debug!("Pulled remote preferences for {}", user_id);
        Ok(document)
    }

    async fn push(
        &self,
        session: &Session,
        document: &PreferenceDocument,
    ) -> Result<Ack, SyncUnavailable> {
        let user_id = Self::require_user_id(session)?;

        let settings = document
            .clone()
            .stamped(self.clock.now(), Some(user_id))
            .to_object();
        let body = SaveSettingsRequest {
            user_id,
            settings: &settings,
        };

        let result = self
            .client
            .post(self.url(SAVE_SETTINGS_PATH))
            .bearer_auth(&session.credential)
            .json(&body)
            .send()
            .await;
        let response = Self::check_status(result)?;

        let body: SaveSettingsResponse = response
            .json()
            .await
            .map_err(|e| Self::malformed(e.to_string()))?;

        if !body.success {
            return Err(SyncUnavailable::Rejected {
                message: body
                    .message
                    .unwrap_or_else(|| "server reported success=false".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!("Pushed preferences for {}", user_id);
        Ok(Ack {
            message: body.message,
        })
    }
}
