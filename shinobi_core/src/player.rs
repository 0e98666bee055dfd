use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::card::Color;

pub type PlayerId = u64;

/// A seated player as the server reports it. `cards` is the public province:
/// a count per color, never containing ninja.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub pid: PlayerId,
    pub username: String,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub cards: BTreeMap<Color, u32>,
}

impl Player {
    pub fn new(pid: PlayerId, username: &str) -> Self {
        Player {
            pid,
            username: username.to_string(),
            color: None,
            cards: BTreeMap::new(),
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_cards(mut self, cards: &[(Color, u32)]) -> Self {
        self.cards.extend(cards.iter().copied());
        self
    }

    pub fn count(&self, color: Color) -> u32 {
        self.cards.get(&color).copied().unwrap_or(0)
    }

    pub fn add_card(&mut self, color: Color) {
        *self.cards.entry(color).or_insert(0) += 1;
    }

    /// Takes one card of `color` out of the province. Counts never drop below
    /// zero; returns whether a card was actually removed.
    pub fn remove_card(&mut self, color: Color) -> bool {
        match self.cards.get_mut(&color) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn stack(&self) -> impl Iterator<Item = (Color, u32)> + '_ {
        self.cards
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&color, &count)| (color, count))
    }
}
