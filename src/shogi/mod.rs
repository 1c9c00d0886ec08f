pub mod board;
pub mod engine;
pub mod piece;

pub use board::Shogi;
pub use engine::{RulesEngine, ShogiError};
pub use piece::{Color, Kind, Piece, Square};
