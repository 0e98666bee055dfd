use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{EnumMessage, IntoEnumIterator};
use strum_macros::{Display, EnumIter, EnumMessage, EnumString};

/// Card identity. Variants are declared alphabetically so that the derived
/// ordering matches the order the server's color names sort in.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    EnumMessage,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[strum(message = "Deploy it to an opponent's province, or to your own in the second order.")]
    Blue,
    #[strum(message = "Deploy it to an opponent's province, or to your own in the second order.")]
    Green,
    #[strum(
        message = "Play it in the first order to kill a card in an opponent's province. It never lands in a province."
    )]
    Ninja,
    #[strum(message = "Deploy it to an opponent's province, or to your own in the second order.")]
    Purple,
    #[strum(message = "Deploy it to an opponent's province, or to your own in the second order.")]
    Red,
    #[strum(message = "Deploy it to an opponent's province, or to your own in the second order.")]
    Yellow,
}

impl Color {
    pub fn is_ninja(&self) -> bool {
        self == &Color::Ninja
    }

    /// Colors that may appear in a province.
    pub fn stack_colors() -> impl Iterator<Item = Color> {
        Color::iter().filter(|c| !c.is_ninja())
    }

    pub fn rules() -> String {
        Color::iter().map(|c| c.rule()).join("\n")
    }

    pub fn rule(&self) -> String {
        format!(
            "{}: {}",
            self,
            self.get_message().unwrap_or("No rule")
        )
    }
}
