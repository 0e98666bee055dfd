use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{card::Color, player::PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SubMove {
    Deploy { to: PlayerId, color: Color },
    Ninja { to: PlayerId, color: Color },
    Transfer { from: PlayerId, to: PlayerId, color: Color },
    Attack { to: PlayerId, color: Color },
}

impl SubMove {
    /// Cards this order takes out of play: the ninja spent from the hand and
    /// any province card it kills.
    pub fn discards(&self) -> Vec<Color> {
        match *self {
            SubMove::Ninja { color, .. } => vec![Color::Ninja, color],
            SubMove::Attack { color, .. } => vec![color],
            SubMove::Deploy { .. } | SubMove::Transfer { .. } => vec![],
        }
    }
}

impl fmt::Display for SubMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubMove::Deploy { to, color } => write!(f, "deploy {} to {}", color, to),
            SubMove::Ninja { to, color } => write!(f, "ninja on {} of {}", color, to),
            SubMove::Transfer { from, to, color } => {
                write!(f, "transfer {} from {} to {}", color, from, to)
            }
            SubMove::Attack { to, color } => write!(f, "attack {} of {}", color, to),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    First,
    Second,
    Third,
}

/// The move being composed. `third == Some(None)` records a declined attack,
/// which is different from the third order not having been given yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Move {
    pub first: Option<SubMove>,
    pub second: Option<SubMove>,
    pub third: Option<Option<SubMove>>,
}

impl Move {
    pub fn new() -> Self {
        Move::default()
    }

    pub fn write(&mut self, order: Order, sub_move: Option<SubMove>) {
        match order {
            Order::First => self.first = sub_move,
            Order::Second => self.second = sub_move,
            Order::Third => self.third = Some(sub_move),
        }
    }

    pub fn filled(&self) -> usize {
        [
            self.first.is_some(),
            self.second.is_some(),
            self.third.is_some(),
        ]
        .iter()
        .filter(|&&f| f)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.filled() == 3
    }

    pub fn clear(&mut self) {
        *self = Move::default();
    }

    pub fn complete(&self) -> Option<CompleteMove> {
        match (self.first, self.second, self.third) {
            (Some(first), Some(second), Some(third)) => Some(CompleteMove {
                first,
                second,
                third,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteMove {
    pub first: SubMove,
    pub second: SubMove,
    pub third: Option<SubMove>,
}
