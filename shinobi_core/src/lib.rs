pub mod api;
pub mod board;
pub mod card;
pub mod error;
pub mod events;
pub mod game;
pub mod hand;
pub mod notice;
pub mod play;
pub mod player;
pub mod selection;
pub mod session;
pub mod sync;
pub mod turn;
pub mod utils;

pub use session::{Route, Session};
pub use sync::Synchronizer;
pub use turn::{Input, TurnMachine, TurnPhase};
