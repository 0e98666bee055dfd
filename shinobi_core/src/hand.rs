use serde::{Deserialize, Serialize};

use crate::{card::Color, utils::VecExtensions};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Color>,
}

impl Hand {
    pub fn from_snapshot(mut cards: Vec<Color>) -> Self {
        cards.sort();
        Hand { cards }
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.cards.get(index).copied()
    }

    pub fn cards(&self) -> &[Color] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, color: Color) -> bool {
        self.cards.contains(&color)
    }

    pub fn count(&self, color: Color) -> usize {
        self.cards.iter().filter(|&&c| c == color).count()
    }

    pub fn remove_one(&mut self, color: Color) -> bool {
        self.cards.remove_first_where(|&c| c == color).is_some()
    }
}
