use itertools::Itertools;

use crate::{
    card::Color,
    hand::Hand,
    player::{Player, PlayerId},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub players: Vec<Player>,
    pub hand: Hand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    TakeFromHand(Color),
    AddCard(PlayerId, Color),
    RemoveCard(PlayerId, Color),
}

impl Board {
    pub fn new(players: Vec<Player>, hand: Hand) -> Self {
        Board { players, hand }
    }

    pub fn player(&self, pid: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.pid == pid)
    }

    pub fn player_mut(&mut self, pid: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.pid == pid)
    }

    pub fn count(&self, pid: PlayerId, color: Color) -> u32 {
        self.player(pid).map(|p| p.count(color)).unwrap_or(0)
    }

    pub fn is_seated(&self, pid: PlayerId) -> bool {
        self.player(pid).is_some()
    }

    pub fn stack_entries(&self) -> Vec<(PlayerId, Color)> {
        self.players
            .iter()
            .flat_map(|p| p.stack().map(move |(color, _)| (p.pid, color)))
            .collect_vec()
    }

    pub fn total(&self, color: Color) -> u64 {
        let stacked: u64 = self.players.iter().map(|p| p.count(color) as u64).sum();
        stacked + self.hand.count(color) as u64
    }

    /// Whether `effect` can be applied without creating or destroying a card.
    pub fn permits(&self, effect: &Effect) -> bool {
        match *effect {
            Effect::TakeFromHand(color) => self.hand.contains(color),
            Effect::AddCard(pid, _) => self.is_seated(pid),
            Effect::RemoveCard(pid, color) => self.count(pid, color) > 0,
        }
    }

    pub fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::TakeFromHand(color) => {
                self.hand.remove_one(color);
            }
            Effect::AddCard(pid, color) => {
                if let Some(player) = self.player_mut(pid) {
                    player.add_card(color);
                }
            }
            Effect::RemoveCard(pid, color) => {
                if let Some(player) = self.player_mut(pid) {
                    player.remove_card(color);
                }
            }
        }
    }
}
