//! Shogi game record player
//!
//! Loads records in the JSON Kifu Format, walks them ply by ply along any
//! branch, records new moves as continuations or forks, and renders moves
//! as readable Japanese notation.

pub mod config;
pub mod error;
pub mod format;
pub mod jkf;
pub mod player;
pub mod readable;
pub mod shogi;

pub use error::{ParseError, PlayerError};
pub use jkf::{JsonKifu, MoveFormat, MoveNode, Special};
pub use player::Player;
pub use shogi::{Color, Kind, RulesEngine, Shogi, Square};
