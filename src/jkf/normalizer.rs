use std::fmt;

use log::debug;

use super::{JsonKifu, MoveFormat, MoveNode};
use crate::format::KifuFormat;
use crate::shogi::{Color, Piece, RulesEngine, Shogi, ShogiError, Square};

/// Repairs the derived fields of a record after parsing or editing
pub trait Normalizer {
    /// Bring a freshly parsed record of `format` into canonical shape
    fn normalize(&self, format: KifuFormat, kifu: &mut JsonKifu) -> Result<(), NormalizeError>;

    /// Recompute derived fields after a structural edit of the tree
    fn normalize_minimal(&self, kifu: &mut JsonKifu) -> Result<(), NormalizeError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeError {
    pub ply: usize,
    pub source: ShogiError,
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot replay ply {}: {}", self.ply, self.source)
    }
}

impl std::error::Error for NormalizeError {}

/// Replays every line of the record from its initial position and fills in
/// `color`, `piece`, `capture`, `same` and `relative` on each move.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalNormalizer;

impl Normalizer for MinimalNormalizer {
    fn normalize(&self, format: KifuFormat, kifu: &mut JsonKifu) -> Result<(), NormalizeError> {
        debug!("normalizing {} record with {} nodes", format, kifu.node_count());
        self.normalize_minimal(kifu)
    }

    fn normalize_minimal(&self, kifu: &mut JsonKifu) -> Result<(), NormalizeError> {
        let mut shogi = Shogi::from_initial(kifu.initial.as_ref())
            .map_err(|source| NormalizeError { ply: 0, source })?;
        normalize_branch(&mut shogi, &mut kifu.moves, 0, None)
    }
}

/// Normalize `branch`, whose first node sits at `start_ply`, and leave the
/// engine where it was found.
fn normalize_branch(
    shogi: &mut Shogi,
    branch: &mut [MoveNode],
    start_ply: usize,
    mut previous_to: Option<Square>,
) -> Result<(), NormalizeError> {
    let mut applied: Vec<MoveFormat> = Vec::new();

    for (i, node) in branch.iter_mut().enumerate() {
        let ply = start_ply + i;

        // forks replace this node, so they start from the same position
        for fork in node.forks.iter_mut() {
            normalize_branch(shogi, fork, ply, previous_to)?;
        }

        if let Some(mv) = node.as_move_mut() {
            fill_derived(shogi, mv, previous_to).map_err(|source| NormalizeError { ply, source })?;
            shogi.apply(mv).map_err(|source| NormalizeError { ply, source })?;
            previous_to = Some(mv.to);
            applied.push(mv.clone());
        }
    }

    for mv in applied.iter().rev() {
        shogi
            .undo(mv)
            .map_err(|source| NormalizeError { ply: start_ply, source })?;
    }
    Ok(())
}

fn fill_derived(
    shogi: &Shogi,
    mv: &mut MoveFormat,
    previous_to: Option<Square>,
) -> Result<(), ShogiError> {
    let color = shogi.turn();
    mv.color = Some(color);
    mv.same = if previous_to == Some(mv.to) { Some(true) } else { None };

    match mv.from {
        Some(from) => {
            let piece = shogi.get(from).ok_or(ShogiError::NoPiece(from))?;
            mv.piece = Some(piece.kind);
            mv.capture = shogi.get(mv.to).map(|p| p.kind);
            mv.relative = relative_for_move(shogi, from, mv.to, piece);
        }
        None => {
            let kind = mv.piece.ok_or(ShogiError::MissingDropPiece(mv.to))?;
            mv.capture = None;
            // a drop only needs 打 when a board piece could have gone there
            mv.relative = if shogi.sources_to(mv.to, kind, color).is_empty() {
                None
            } else {
                Some("H".to_string())
            };
        }
    }
    Ok(())
}

/// Disambiguation letters for a board move, `None` when the move is unique.
///
/// Vertical `U`/`M`/`D` when that alone singles the piece out, otherwise
/// horizontal `L`/`C`/`R` (`C` only for a straight advance), otherwise
/// both. Directions are from the mover's side of the board.
fn relative_for_move(shogi: &Shogi, from: Square, to: Square, piece: Piece) -> Option<String> {
    let sources = shogi.sources_to(to, piece.kind, piece.color);
    if sources.len() < 2 {
        return None;
    }

    let vector = |square: Square| -> (i8, i8) {
        let dx = (square.x as i8 - to.x as i8).signum();
        let dy = (square.y as i8 - to.y as i8).signum();
        match piece.color {
            Color::Black => (dx, dy),
            Color::White => (-dx, -dy),
        }
    };
    let (rx, ry) = vector(from);
    let vectors: Vec<(i8, i8)> = sources.iter().map(|&s| vector(s)).collect();

    let vertical = match ry {
        1 => "U",
        0 => "M",
        _ => "D",
    };
    // 直 only for a straight advance; a straight retreat is told apart by side
    let horizontal = match (rx, ry) {
        (1, _) => Some(("L", vectors.iter().filter(|v| v.0 == 1).count() == 1)),
        (-1, _) => Some(("R", vectors.iter().filter(|v| v.0 == -1).count() == 1)),
        (_, 1) => Some(("C", vectors.iter().filter(|v| **v == (0, 1)).count() == 1)),
        _ => side_of(from, &sources, piece.color).map(|side| (side, true)),
    };

    let relative = if vectors.iter().filter(|v| v.1 == ry).count() == 1 {
        vertical.to_string()
    } else {
        match horizontal {
            Some((side, true)) => side.to_string(),
            Some((side, false)) => format!("{}{}", side, vertical),
            None => vertical.to_string(),
        }
    };
    Some(relative)
}

/// `L` when every other source is to the mover's right, `R` when every
/// other source is to its left
fn side_of(from: Square, sources: &[Square], color: Color) -> Option<&'static str> {
    let offsets: Vec<i8> = sources
        .iter()
        .filter(|&&s| s != from)
        .map(|s| {
            let dx = (s.x as i8 - from.x as i8).signum();
            match color {
                Color::Black => dx,
                Color::White => -dx,
            }
        })
        .collect();
    if offsets.iter().all(|&d| d < 0) {
        Some("L")
    } else if offsets.iter().all(|&d| d > 0) {
        Some("R")
    } else {
        None
    }
}
