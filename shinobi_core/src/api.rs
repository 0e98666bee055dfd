use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    card::Color,
    error::ApiError,
    game::{Game, GameId, User},
    play::CompleteMove,
    player::{Player, PlayerId},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub game: Option<Game>,
}

#[async_trait]
pub trait GameApi: Send + Sync {
    async fn list_games(&self) -> Result<Vec<Game>, ApiError>;

    async fn create_game(&self, name: &str) -> Result<Vec<String>, ApiError>;

    async fn fetch_game(&self, gid: GameId) -> Result<Game, ApiError>;

    async fn start_game(&self, gid: GameId) -> Result<Vec<String>, ApiError>;

    async fn fetch_players(&self, gid: GameId) -> Result<Vec<Player>, ApiError>;

    async fn fetch_hand(&self, gid: GameId, pid: PlayerId) -> Result<Vec<Color>, ApiError>;

    async fn join(&self, gid: GameId) -> Result<Vec<String>, ApiError>;

    /// Leaving and kicking are the same call with a different pid.
    async fn remove_player(&self, gid: GameId, pid: PlayerId) -> Result<Vec<String>, ApiError>;

    async fn submit_move(
        &self,
        gid: GameId,
        pid: PlayerId,
        body: &CompleteMove,
    ) -> Result<SubmitResponse, ApiError>;

    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
}
