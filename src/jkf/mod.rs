//! JSON Kifu Format record model
//!
//! A record is a header, an optional starting position and the main line.
//! The main line's first node is the placeholder for ply 0; each later node
//! carries a move or a terminal outcome, and may list alternative branches
//! ("forks") that start at the same ply.

pub mod node;
pub mod normalizer;
pub mod tree;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::shogi::{Color, Kind, Piece, Square};

pub use node::{MoveNode, NodeContent, Special};
pub use normalizer::{MinimalNormalizer, Normalizer};
pub use tree::BranchPath;

/// A complete game record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonKifu {
    #[serde(default)]
    pub header: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<Initial>,
    pub moves: Vec<MoveNode>,
}

impl JsonKifu {
    /// Empty even-game record holding only the ply-0 placeholder
    pub fn new() -> Self {
        JsonKifu {
            header: BTreeMap::new(),
            initial: None,
            moves: vec![MoveNode::root()],
        }
    }

    /// Record with the given main line after the ply-0 placeholder
    pub fn from_moves<I: IntoIterator<Item = MoveNode>>(moves: I) -> Self {
        let mut kifu = JsonKifu::new();
        kifu.moves.extend(moves);
        kifu
    }

    /// Total number of nodes in the tree, forks included
    pub fn node_count(&self) -> usize {
        fn count(branch: &[MoveNode]) -> usize {
            branch
                .iter()
                .map(|node| 1 + node.forks.iter().map(|f| count(f)).sum::<usize>())
                .sum()
        }
        count(&self.moves)
    }
}

impl Default for JsonKifu {
    fn default() -> Self {
        Self::new()
    }
}

/// Starting position: a named preset, or `Other` with explicit data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initial {
    pub preset: Preset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StateFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    #[serde(rename = "HIRATE")]
    Hirate,
    #[serde(rename = "KY")]
    Lance,
    #[serde(rename = "KY_R")]
    RightLance,
    #[serde(rename = "KA")]
    Bishop,
    #[serde(rename = "HI")]
    Rook,
    #[serde(rename = "HIKY")]
    RookLance,
    #[serde(rename = "2")]
    TwoPieces,
    #[serde(rename = "4")]
    FourPieces,
    #[serde(rename = "6")]
    SixPieces,
    #[serde(rename = "8")]
    EightPieces,
    #[serde(rename = "10")]
    TenPieces,
    #[serde(rename = "OTHER")]
    Other,
}

/// Position snapshot: side to move, `board[x - 1][y - 1]`, and the hands of
/// black (`hands[0]`) and white (`hands[1]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFormat {
    pub color: Color,
    pub board: Vec<Vec<BoardCell>>,
    pub hands: [BTreeMap<Kind, u32>; 2],
}

/// One board square, `{}` when empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
}

impl BoardCell {
    pub fn piece(&self) -> Option<Piece> {
        match (self.color, self.kind) {
            (Some(color), Some(kind)) => Some(Piece::new(color, kind)),
            _ => None,
        }
    }
}

impl From<Option<Piece>> for BoardCell {
    fn from(piece: Option<Piece>) -> Self {
        match piece {
            Some(p) => BoardCell { color: Some(p.color), kind: Some(p.kind) },
            None => BoardCell::default(),
        }
    }
}

/// A move as recorded. Board moves have `from`; drops have none and must
/// name `piece`. `color`, `same`, `capture` and `relative` are derived and
/// filled in by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Square>,
    pub to: Square,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece: Option<Kind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<Kind>,
    /// Disambiguation letters, any of `L C R U M D H`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative: Option<String>,
}

impl MoveFormat {
    /// Board move with no promotion decision
    pub fn board(from: Square, to: Square) -> Self {
        MoveFormat {
            color: None,
            from: Some(from),
            to,
            piece: None,
            same: None,
            promote: None,
            capture: None,
            relative: None,
        }
    }

    pub fn drop(to: Square, piece: Kind) -> Self {
        MoveFormat {
            color: None,
            from: None,
            to,
            piece: Some(piece),
            same: None,
            promote: None,
            capture: None,
            relative: None,
        }
    }

    pub fn with_promote(mut self, promote: bool) -> Self {
        self.promote = Some(promote);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_piece(mut self, piece: Kind) -> Self {
        self.piece = Some(piece);
        self
    }

    pub fn is_drop(&self) -> bool {
        self.from.is_none()
    }
}

/// Clock reading attached to a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFormat {
    pub now: Time,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Time>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    pub m: u32,
    pub s: u32,
}
