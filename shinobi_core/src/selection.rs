use crate::{card::Color, player::PlayerId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    HandCard {
        index: usize,
    },
    StackCard {
        pid: PlayerId,
        color: Color,
    },
}

impl Selection {
    pub fn is_none(&self) -> bool {
        self == &Selection::None
    }

    pub fn is_hand_selected(&self, index: usize) -> bool {
        matches!(*self, Selection::HandCard { index: i } if i == index)
    }

    pub fn is_stack_selected(&self, pid: PlayerId, color: Color) -> bool {
        matches!(*self, Selection::StackCard { pid: p, color: c } if p == pid && c == color)
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }
}
