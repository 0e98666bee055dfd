use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::player::PlayerId;

pub type GameId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Setup,
    Started,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub gid: GameId,
    #[serde(default)]
    pub name: String,
    pub owner: String,
    pub state: GameState,
    #[serde(default, alias = "currentPlayer")]
    pub current_player: Option<PlayerId>,
    #[serde(default)]
    pub winners: Vec<PlayerId>,
}

impl Game {
    pub fn is_started(&self) -> bool {
        self.state == GameState::Started
    }

    pub fn is_turn_of(&self, pid: PlayerId) -> bool {
        self.is_started() && self.current_player == Some(pid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub score: u32,
}
