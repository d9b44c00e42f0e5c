use crate::action::GameAction;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://three.arcprize.org/api";

#[derive(Debug, Error)]
pub enum Arc3ClientError {
    #[error("transport error contacting ARC-3 API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("ARC-3 API returned HTTP {status}: {body}")]
    Protocol { status: u16, body: String },
    #[error("ARC-3 API rate limit exceeded (600 rpm)")]
    RateLimited,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandResponse {
    pub guid: String,
    pub frame: Value,
    pub state: String,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub win_score: Option<i64>,
    #[serde(default)]
    pub available_actions: Option<Value>,
}

#[derive(Debug, Serialize)]
struct CommandBody {
    game_id: String,
    card_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    x: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<u8>,
}

/// Thin wrapper over the remote ARC-3 game API. Every command carries the
/// scorecard's `card_id`; `guid` is the running game session id, absent
/// only on the very first RESET.
pub struct Arc3Client {
    base_url: String,
    client: reqwest::Client,
    api_key: String,
}

impl Arc3Client {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), client: reqwest::Client::new(), api_key: api_key.into() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn send(&self, action: GameAction, body: CommandBody) -> Result<CommandResponse, Arc3ClientError> {
        let url = format!("{}/cmd/{}", self.base_url, action.as_str());
        let response = self
            .client
            .post(&url)
            .header("X-API-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(Arc3ClientError::RateLimited);
        }
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Arc3ClientError::Protocol { status: status.as_u16(), body: text });
        }
        serde_json::from_str(&text)
            .map_err(|e| Arc3ClientError::Protocol { status: status.as_u16(), body: format!("could not parse response: {e}") })
    }

    pub async fn reset(&self, game_id: &str, card_id: &str, guid: Option<&str>) -> Result<CommandResponse, Arc3ClientError> {
        self.send(
            GameAction::Reset,
            CommandBody { game_id: game_id.to_string(), card_id: card_id.to_string(), guid: guid.map(String::from), x: None, y: None },
        )
        .await
    }

    pub async fn simple_action(
        &self,
        action: GameAction,
        game_id: &str,
        card_id: &str,
        guid: &str,
    ) -> Result<CommandResponse, Arc3ClientError> {
        self.send(
            action,
            CommandBody { game_id: game_id.to_string(), card_id: card_id.to_string(), guid: Some(guid.to_string()), x: None, y: None },
        )
        .await
    }

    pub async fn action6(&self, game_id: &str, card_id: &str, guid: &str, x: u8, y: u8) -> Result<CommandResponse, Arc3ClientError> {
        self.send(
            GameAction::Action6,
            CommandBody { game_id: game_id.to_string(), card_id: card_id.to_string(), guid: Some(guid.to_string()), x: Some(x), y: Some(y) },
        )
        .await
    }

    pub async fn open_scorecard(&self) -> Result<String, Arc3ClientError> {
        let url = format!("{}/scorecard/open", self.base_url);
        let response = self.client.post(&url).header("X-API-Key", &self.api_key).json(&json!({})).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Arc3ClientError::Protocol { status: status.as_u16(), body: text });
        }
        let parsed: Value = serde_json::from_str(&text)
            .map_err(|e| Arc3ClientError::Protocol { status: status.as_u16(), body: format!("could not parse scorecard id: {e}") })?;
        parsed["card_id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| Arc3ClientError::Protocol { status: status.as_u16(), body: "scorecard open response missing card_id".into() })
    }

    pub async fn close_scorecard(&self, card_id: &str) -> Result<(), Arc3ClientError> {
        let url = format!("{}/scorecard/close", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("X-API-Key", &self.api_key)
            .json(&json!({ "card_id": card_id }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Arc3ClientError::Protocol { status: status.as_u16(), body });
        }
        Ok(())
    }
}
