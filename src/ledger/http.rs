//! JSON gateway client for the ledger.

use super::{LedgerReader, LedgerWriter};
use crate::{LedgerConfig, LedgerError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strictly_connect4::{Address, Board, Column, GameId, GameSnapshot};
use tracing::{debug, error, info, instrument};

/// Header carrying the account the gateway signs writes for.
const ACCOUNT_HEADER: &str = "x-ledger-account";

/// Game state as returned by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateResponse {
    /// Creator address.
    pub player1: String,
    /// Joiner address, zero while waiting.
    pub player2: String,
    /// Address due to move.
    pub current_player: String,
    /// Winner address, zero when none.
    pub winner: String,
    /// 42 cell codes, row 0 first.
    pub board: Vec<u8>,
    /// Whether the game still accepts moves.
    pub is_active: bool,
    /// Ledger time of the last move in seconds.
    pub last_move_time: i64,
    /// Move allowance in seconds.
    pub timeout: i64,
}

impl GameStateResponse {
    /// Converts the wire payload into a snapshot.
    #[instrument(skip(self))]
    pub fn into_snapshot(self, game_id: GameId) -> Result<GameSnapshot, LedgerError> {
        Ok(GameSnapshot {
            game_id,
            player1: Address::new(self.player1),
            player2: Address::new(self.player2),
            current_player: Address::new(self.current_player),
            winner: Address::new(self.winner),
            board: Board::from_codes(&self.board)?,
            is_active: self.is_active,
            last_move_timestamp: self.last_move_time,
            timeout_duration: self.timeout,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedGame {
    game_id: u64,
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    error: String,
}

/// Ledger client speaking JSON to a gateway.
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    base_url: String,
    client: reqwest::Client,
    account: Option<Address>,
}

impl HttpLedgerClient {
    /// Creates a client; `request_timeout` bounds every call.
    #[instrument(skip_all, fields(base_url = %base_url))]
    pub fn new(
        base_url: String,
        account: Option<Address>,
        request_timeout: Duration,
    ) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| LedgerError::transport(format!("Failed to build HTTP client: {}", e)))?;
        info!(account = ?account, "Created ledger client");
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            account,
        })
    }

    /// Creates a client from configuration.
    #[instrument(skip(config))]
    pub fn from_config(config: &LedgerConfig) -> Result<Self, LedgerError> {
        Self::new(
            config.gateway_url().clone(),
            config.account().clone(),
            Duration::from_millis(*config.request_timeout_ms()),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps a non-success response to a ledger error.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, LedgerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GatewayError>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        error!(status = %status, message = %message, "Gateway returned error");
        match status {
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                Err(LedgerError::transport(format!("HTTP {}: {}", status, message)))
            }
            _ => Err(LedgerError::revert(message)),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LedgerError> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, LedgerError> {
        let account = self
            .account
            .as_ref()
            .ok_or_else(|| LedgerError::revert("No account configured for ledger writes"))?;
        debug!(path, body = %body, "Posting to gateway");
        let response = self
            .client
            .post(self.url(path))
            .header(ACCOUNT_HEADER, account.as_str())
            .json(&body)
            .send()
            .await?;
        Self::check(response).await
    }
}

#[async_trait]
impl LedgerReader for HttpLedgerClient {
    #[instrument(skip(self))]
    async fn get_game_state(&self, game_id: GameId) -> Result<GameSnapshot, LedgerError> {
        let state: GameStateResponse = self.get_json(&format!("/games/{}/state", game_id)).await?;
        debug!(is_active = state.is_active, "Got game state");
        state.into_snapshot(game_id)
    }

    #[instrument(skip(self))]
    async fn get_game_info(&self, game_id: GameId) -> Result<String, LedgerError> {
        let response = self
            .client
            .get(self.url(&format!("/games/{}/info", game_id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.text().await?)
    }

    #[instrument(skip(self))]
    async fn get_available_games(&self) -> Result<Vec<GameId>, LedgerError> {
        let ids: Vec<u64> = self.get_json("/games/available").await?;
        Ok(ids.into_iter().map(GameId::new).collect())
    }
}

#[async_trait]
impl LedgerWriter for HttpLedgerClient {
    #[instrument(skip(self))]
    async fn create_game(&self, timeout_secs: i64) -> Result<GameId, LedgerError> {
        let response = self
            .post("/games", serde_json::json!({ "timeout": timeout_secs }))
            .await?;
        let created: CreatedGame = response.json().await?;
        info!(game_id = created.game_id, "Game created");
        Ok(GameId::new(created.game_id))
    }

    #[instrument(skip(self))]
    async fn join_game(&self, game_id: GameId) -> Result<(), LedgerError> {
        self.post(&format!("/games/{}/join", game_id), serde_json::json!({}))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn auto_matchmaking(&self, timeout_secs: i64) -> Result<GameId, LedgerError> {
        let response = self
            .post("/matchmaking", serde_json::json!({ "timeout": timeout_secs }))
            .await?;
        let matched: CreatedGame = response.json().await?;
        info!(game_id = matched.game_id, "Matched to game");
        Ok(GameId::new(matched.game_id))
    }

    #[instrument(skip(self))]
    async fn make_move(&self, game_id: GameId, column: Column) -> Result<(), LedgerError> {
        self.post(
            &format!("/games/{}/moves", game_id),
            serde_json::json!({ "column": column.get() }),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn check_timeout(&self, game_id: GameId) -> Result<(), LedgerError> {
        self.post(&format!("/games/{}/timeout", game_id), serde_json::json!({}))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn cleanup_timed_out_games(&self) -> Result<(), LedgerError> {
        self.post("/games/cleanup", serde_json::json!({})).await?;
        Ok(())
    }
}
