use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{game::GameState, player::PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterAction {
    Join,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterChange {
    pub action: RosterAction,
    pub player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Players(Option<RosterChange>),
    CurrentPlayer(Option<PlayerId>),
    State(Option<GameState>),
}

impl ServerEvent {
    /// Parses an event by name. Unknown names yield `None`; malformed data is
    /// tolerated since the payload is informational.
    pub fn parse(name: &str, data: &str) -> Option<Self> {
        let data = data.trim();
        match name {
            "players" => Some(ServerEvent::Players(serde_json::from_str(data).ok())),
            "current_player" => Some(ServerEvent::CurrentPlayer(data.parse().ok())),
            "state" => Some(ServerEvent::State(GameState::from_str(data).ok())),
            _ => None,
        }
    }
}
