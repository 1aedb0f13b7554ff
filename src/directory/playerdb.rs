use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::constants::directory::{LOOKUP_TIMEOUT_SECS, PLAYERDB_ENDPOINT, PLAYERDB_SOURCE_ID};
use crate::constants::transport::USER_AGENT;
use crate::data::ResolvedIdentity;
use crate::directory::PlayerDirectory;
use crate::errors::ConvertError;
use crate::transport::http::agent_with_timeout;

/// Playerdb response envelope. Only the fields the lookup needs are modeled.
#[derive(Debug, Deserialize)]
struct PlayerDbResponse {
    success: bool,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<PlayerDbData>,
}

#[derive(Debug, Deserialize)]
struct PlayerDbData {
    #[serde(default)]
    player: Option<PlayerDbPlayer>,
}

#[derive(Debug, Deserialize)]
struct PlayerDbPlayer {
    username: String,
    #[serde(default)]
    avatar: Option<String>,
}

/// Directory backed by the playerdb.co HTTP API.
pub struct PlayerDbDirectory {
    endpoint: String,
    agent: ureq::Agent,
}

impl PlayerDbDirectory {
    /// Directory against the public playerdb endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(PLAYERDB_ENDPOINT)
    }

    /// Directory against a custom endpoint; the identifier is appended as a path segment.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            endpoint,
            agent: agent_with_timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS)),
        }
    }

    fn failure(identifier: &str, reason: String) -> ConvertError {
        ConvertError::ResolutionFailure {
            identifier: identifier.to_string(),
            reason,
        }
    }

    fn identity_from_body(identifier: &str, body: &str) -> Result<ResolvedIdentity, ConvertError> {
        let response: PlayerDbResponse = serde_json::from_str(body)
            .map_err(|err| Self::failure(identifier, format!("unparseable response: {err}")))?;
        if !response.success {
            return Err(Self::failure(
                identifier,
                format!(
                    "directory reported no match ({}: {})",
                    response.code.as_deref().unwrap_or("unknown"),
                    response.message.as_deref().unwrap_or("no message")
                ),
            ));
        }
        let player = response
            .data
            .and_then(|data| data.player)
            .ok_or_else(|| Self::failure(identifier, "response carried no player".into()))?;
        Ok(ResolvedIdentity {
            display_name: player.username,
            avatar_ref: player.avatar.filter(|avatar| !avatar.is_empty()),
        })
    }
}

impl Default for PlayerDbDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerDirectory for PlayerDbDirectory {
    fn id(&self) -> &str {
        PLAYERDB_SOURCE_ID
    }

    fn lookup(&self, identifier: &str) -> Result<ResolvedIdentity, ConvertError> {
        let url = format!("{}/{}", self.endpoint, identifier);
        let response = self
            .agent
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|err| {
                warn!("[cubostats:playerdb] lookup for '{identifier}' failed: {err}");
                Self::failure(identifier, format!("request failed: {err}"))
            })?;
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|err| Self::failure(identifier, format!("unreadable response: {err}")))?;
        let identity = Self::identity_from_body(identifier, &body)?;
        info!(
            "[cubostats:playerdb] resolved '{}' -> {}",
            identifier, identity.display_name
        );
        Ok(identity)
    }
}
