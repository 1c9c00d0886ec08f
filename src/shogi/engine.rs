use std::collections::BTreeMap;
use std::fmt;

use super::{Color, Kind, Piece, Square};
use crate::jkf::MoveFormat;

/// Live position a player drives while navigating a record.
///
/// `undo` must be the exact inverse of the most recent `apply`; the player
/// relies on that when it probes a new move and takes it back again.
pub trait RulesEngine {
    /// Play `mv` for the side to move. Fails without changing anything when illegal.
    fn apply(&mut self, mv: &MoveFormat) -> Result<(), ShogiError>;

    /// Take back `mv`, which must be the most recently applied move.
    fn undo(&mut self, mv: &MoveFormat) -> Result<(), ShogiError>;

    fn get(&self, square: Square) -> Option<Piece>;

    /// Count of every hand kind held by `color`, zeros included.
    fn hand_counts(&self, color: Color) -> BTreeMap<Kind, u32>;

    fn turn(&self) -> Color;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShogiError {
    OffBoard(Square),
    NoPiece(Square),
    WrongTurn { square: Square, color: Color },
    Unreachable { from: Square, to: Square, kind: Kind },
    OwnPieceCaptured(Square),
    KingCaptured(Square),
    CannotPromote { kind: Kind, from: Square, to: Square },
    SquareOccupied(Square),
    MissingDropPiece(Square),
    NotInHand { kind: Kind, color: Color },
    NothingToUndo,
    UndoMismatch { expected: Square, got: Square },
    MalformedPosition(String),
}

impl fmt::Display for ShogiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShogiError::OffBoard(sq) => write!(f, "square {} is off the board", sq),
            ShogiError::NoPiece(sq) => write!(f, "no piece on {}", sq),
            ShogiError::WrongTurn { square, color } => {
                write!(f, "piece on {} does not belong to {}, the side to move", square, color)
            }
            ShogiError::Unreachable { from, to, kind } => {
                write!(f, "{} on {} cannot move to {}", kind, from, to)
            }
            ShogiError::OwnPieceCaptured(sq) => write!(f, "cannot capture own piece on {}", sq),
            ShogiError::KingCaptured(sq) => write!(f, "the king on {} cannot be taken", sq),
            ShogiError::CannotPromote { kind, from, to } => {
                write!(f, "{} moving {} to {} cannot promote", kind, from, to)
            }
            ShogiError::SquareOccupied(sq) => write!(f, "cannot drop on occupied square {}", sq),
            ShogiError::MissingDropPiece(sq) => write!(f, "drop on {} does not name a piece", sq),
            ShogiError::NotInHand { kind, color } => write!(f, "{} has no {} in hand", color, kind),
            ShogiError::NothingToUndo => write!(f, "no move to undo"),
            ShogiError::UndoMismatch { expected, got } => write!(
                f,
                "undo does not match the last move: expected destination {}, got {}",
                expected, got
            ),
            ShogiError::MalformedPosition(msg) => write!(f, "malformed initial position: {}", msg),
        }
    }
}

impl std::error::Error for ShogiError {}
