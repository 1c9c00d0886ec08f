/// Shogi position tracking for record playback
///
/// Keeps the 9x9 board, both hands and the side to move, and checks each
/// move against the piece's movement before playing it. Every applied move
/// is pushed on an undo stack so that `undo` restores the exact previous
/// position, captured piece included, without relying on the move's
/// `capture` annotation.
///
/// Deliberately not checked: leaving the king in check, two pawns on a
/// file, dropping a pawn for mate and drops on squares with no further move.

use std::collections::BTreeMap;

use super::engine::{RulesEngine, ShogiError};
use super::{Color, Kind, Piece, Square};
use crate::jkf::{Initial, MoveFormat, Preset, StateFormat};

type Step = (i8, i8);

// Steps as seen from black; white mirrors them.
const PAWN_STEPS: &[Step] = &[(0, -1)];
const KNIGHT_STEPS: &[Step] = &[(-1, -2), (1, -2)];
const SILVER_STEPS: &[Step] = &[(-1, -1), (0, -1), (1, -1), (-1, 1), (1, 1)];
const GOLD_STEPS: &[Step] = &[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (0, 1)];
const KING_STEPS: &[Step] = &[
    (-1, -1), (0, -1), (1, -1),
    (-1, 0), (1, 0),
    (-1, 1), (0, 1), (1, 1),
];
const DIAGONALS: &[Step] = &[(-1, -1), (1, -1), (-1, 1), (1, 1)];
const ORTHOGONALS: &[Step] = &[(0, -1), (-1, 0), (1, 0), (0, 1)];
const FORWARD: &[Step] = &[(0, -1)];

/// Back rank from file 1 to file 9 (symmetric, so the same for both sides)
const BACK_RANK: [Kind; 9] = [
    Kind::Lance,
    Kind::Knight,
    Kind::Silver,
    Kind::Gold,
    Kind::King,
    Kind::Gold,
    Kind::Silver,
    Kind::Knight,
    Kind::Lance,
];

/// Single steps and sliding directions of a kind
fn movement(kind: Kind) -> (&'static [Step], &'static [Step]) {
    match kind {
        Kind::Pawn => (PAWN_STEPS, &[]),
        Kind::Lance => (&[], FORWARD),
        Kind::Knight => (KNIGHT_STEPS, &[]),
        Kind::Silver => (SILVER_STEPS, &[]),
        Kind::Gold
        | Kind::PromotedPawn
        | Kind::PromotedLance
        | Kind::PromotedKnight
        | Kind::PromotedSilver => (GOLD_STEPS, &[]),
        Kind::Bishop => (&[], DIAGONALS),
        Kind::Rook => (&[], ORTHOGONALS),
        Kind::King => (KING_STEPS, &[]),
        Kind::Horse => (ORTHOGONALS, DIAGONALS),
        Kind::Dragon => (DIAGONALS, ORTHOGONALS),
    }
}

fn oriented((dx, dy): Step, color: Color) -> Step {
    match color {
        Color::Black => (dx, dy),
        Color::White => (-dx, -dy),
    }
}

#[derive(Debug, Clone)]
struct Played {
    from: Option<Square>,
    to: Square,
    moved: Piece,
    captured: Option<Piece>,
}

/// Shogi position with an undo stack
#[derive(Debug, Clone)]
pub struct Shogi {
    /// Indexed `[x - 1][y - 1]`
    board: [[Option<Piece>; 9]; 9],
    hands: [BTreeMap<Kind, u32>; 2],
    turn: Color,
    history: Vec<Played>,
}

impl Shogi {
    /// Even game starting position, black to move
    pub fn new() -> Self {
        let mut shogi = Shogi::empty(Color::Black);
        for x in 1..=9u8 {
            let kind = BACK_RANK[(x - 1) as usize];
            shogi.place(Square::new(x, 1), Some(Piece::new(Color::White, kind)));
            shogi.place(Square::new(x, 9), Some(Piece::new(Color::Black, kind)));
            shogi.place(Square::new(x, 3), Some(Piece::new(Color::White, Kind::Pawn)));
            shogi.place(Square::new(x, 7), Some(Piece::new(Color::Black, Kind::Pawn)));
        }
        shogi.place(Square::new(8, 2), Some(Piece::new(Color::White, Kind::Rook)));
        shogi.place(Square::new(2, 2), Some(Piece::new(Color::White, Kind::Bishop)));
        shogi.place(Square::new(8, 8), Some(Piece::new(Color::Black, Kind::Bishop)));
        shogi.place(Square::new(2, 8), Some(Piece::new(Color::Black, Kind::Rook)));
        shogi
    }

    /// Build the position a record starts from. `None` means an even game.
    pub fn from_initial(initial: Option<&Initial>) -> Result<Self, ShogiError> {
        let initial = match initial {
            Some(initial) => initial,
            None => return Ok(Shogi::new()),
        };

        if initial.preset == Preset::Other {
            let data = initial.data.as_ref().ok_or_else(|| {
                ShogiError::MalformedPosition("preset OTHER requires position data".to_string())
            })?;
            return Shogi::from_state(data);
        }

        let mut shogi = Shogi::new();
        let removed = handicap_squares(initial.preset);
        if !removed.is_empty() {
            for &(x, y) in removed {
                shogi.place(Square::new(x, y), None);
            }
            // the handicap giver moves first
            shogi.turn = Color::White;
        }
        Ok(shogi)
    }

    /// Build a position from a snapshot in `initial.data` shape
    pub fn from_state(state: &StateFormat) -> Result<Self, ShogiError> {
        if state.board.len() != 9 || state.board.iter().any(|file| file.len() != 9) {
            return Err(ShogiError::MalformedPosition("board must be 9x9".to_string()));
        }

        let mut shogi = Shogi::empty(state.color);
        for (i, file) in state.board.iter().enumerate() {
            for (j, cell) in file.iter().enumerate() {
                let square = Square::new(i as u8 + 1, j as u8 + 1);
                match (cell.color, cell.kind) {
                    (Some(color), Some(kind)) => shogi.place(square, Some(Piece::new(color, kind))),
                    (None, None) => {}
                    _ => {
                        return Err(ShogiError::MalformedPosition(format!(
                            "cell {} needs both color and kind",
                            square
                        )))
                    }
                }
            }
        }

        for (hand, counts) in shogi.hands.iter_mut().zip(state.hands.iter()) {
            for (&kind, &count) in counts {
                if !kind.is_hand_kind() {
                    return Err(ShogiError::MalformedPosition(format!(
                        "{} cannot be held in hand",
                        kind
                    )));
                }
                hand.insert(kind, count);
            }
        }
        Ok(shogi)
    }

    fn empty(turn: Color) -> Self {
        let hand: BTreeMap<Kind, u32> = Kind::HAND_KINDS.iter().map(|&k| (k, 0)).collect();
        Shogi {
            board: [[None; 9]; 9],
            hands: [hand.clone(), hand],
            turn,
            history: Vec::new(),
        }
    }

    fn place(&mut self, square: Square, piece: Option<Piece>) {
        self.board[(square.x - 1) as usize][(square.y - 1) as usize] = piece;
    }

    /// Squares the piece on `from` can move to, own pieces excluded
    pub fn moves_from(&self, from: Square) -> Vec<Square> {
        let piece = match self.get(from) {
            Some(piece) => piece,
            None => return Vec::new(),
        };

        let (steps, slides) = movement(piece.kind);
        let mut targets = Vec::new();

        for &step in steps {
            let (dx, dy) = oriented(step, piece.color);
            if let Some(to) = from.offset(dx, dy) {
                if self.get(to).map_or(true, |p| p.color != piece.color) {
                    targets.push(to);
                }
            }
        }

        for &dir in slides {
            let (dx, dy) = oriented(dir, piece.color);
            let mut current = from;
            while let Some(to) = current.offset(dx, dy) {
                match self.get(to) {
                    None => targets.push(to),
                    Some(p) => {
                        if p.color != piece.color {
                            targets.push(to);
                        }
                        break;
                    }
                }
                current = to;
            }
        }

        targets
    }

    /// Squares holding a `color` `kind` that can move to `to`
    pub fn sources_to(&self, to: Square, kind: Kind, color: Color) -> Vec<Square> {
        let mut sources = Vec::new();
        for x in 1..=9u8 {
            for y in 1..=9u8 {
                let square = Square::new(x, y);
                if self.get(square) == Some(Piece::new(color, kind))
                    && self.moves_from(square).contains(&to)
                {
                    sources.push(square);
                }
            }
        }
        sources
    }

    /// Number of moves on the undo stack
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    fn apply_board_move(&mut self, from: Square, mv: &MoveFormat) -> Result<(), ShogiError> {
        if !from.is_on_board() {
            return Err(ShogiError::OffBoard(from));
        }
        let piece = self.get(from).ok_or(ShogiError::NoPiece(from))?;
        if piece.color != self.turn {
            return Err(ShogiError::WrongTurn { square: from, color: self.turn });
        }
        if self.get(mv.to).map_or(false, |p| p.color == piece.color) {
            return Err(ShogiError::OwnPieceCaptured(mv.to));
        }
        if !self.moves_from(from).contains(&mv.to) {
            return Err(ShogiError::Unreachable { from, to: mv.to, kind: piece.kind });
        }

        let promote = mv.promote == Some(true);
        if promote
            && !(piece.kind.can_promote()
                && (from.in_promotion_zone(piece.color) || mv.to.in_promotion_zone(piece.color)))
        {
            return Err(ShogiError::CannotPromote { kind: piece.kind, from, to: mv.to });
        }

        let captured = self.get(mv.to);
        if captured.map_or(false, |p| p.kind == Kind::King) {
            return Err(ShogiError::KingCaptured(mv.to));
        }
        if let Some(captured) = captured {
            *self.hands[piece.color.index()]
                .entry(captured.kind.unpromoted())
                .or_insert(0) += 1;
        }

        let kind = if promote { piece.kind.promoted() } else { piece.kind };
        self.place(from, None);
        self.place(mv.to, Some(Piece::new(piece.color, kind)));

        self.history.push(Played { from: Some(from), to: mv.to, moved: piece, captured });
        self.turn = self.turn.opposite();
        Ok(())
    }

    fn apply_drop(&mut self, mv: &MoveFormat) -> Result<(), ShogiError> {
        let kind = mv.piece.ok_or(ShogiError::MissingDropPiece(mv.to))?;
        let color = self.turn;
        if !kind.is_hand_kind() {
            return Err(ShogiError::NotInHand { kind, color });
        }
        if let Some(declared) = mv.color {
            if declared != color {
                return Err(ShogiError::WrongTurn { square: mv.to, color });
            }
        }
        if self.get(mv.to).is_some() {
            return Err(ShogiError::SquareOccupied(mv.to));
        }

        let count = match self.hands[color.index()].get_mut(&kind) {
            Some(count) if *count > 0 => count,
            _ => return Err(ShogiError::NotInHand { kind, color }),
        };
        *count -= 1;

        let piece = Piece::new(color, kind);
        self.place(mv.to, Some(piece));
        self.history.push(Played { from: None, to: mv.to, moved: piece, captured: None });
        self.turn = self.turn.opposite();
        Ok(())
    }
}

impl Default for Shogi {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesEngine for Shogi {
    fn apply(&mut self, mv: &MoveFormat) -> Result<(), ShogiError> {
        if !mv.to.is_on_board() {
            return Err(ShogiError::OffBoard(mv.to));
        }
        match mv.from {
            Some(from) => self.apply_board_move(from, mv),
            None => self.apply_drop(mv),
        }
    }

    fn undo(&mut self, mv: &MoveFormat) -> Result<(), ShogiError> {
        let last = self.history.last().ok_or(ShogiError::NothingToUndo)?;
        if last.to != mv.to || last.from != mv.from {
            return Err(ShogiError::UndoMismatch { expected: last.to, got: mv.to });
        }

        let Some(last) = self.history.pop() else {
            return Err(ShogiError::NothingToUndo);
        };
        let hand = &mut self.hands[last.moved.color.index()];
        match last.from {
            Some(from) => {
                self.board[(from.x - 1) as usize][(from.y - 1) as usize] = Some(last.moved);
                self.board[(last.to.x - 1) as usize][(last.to.y - 1) as usize] = last.captured;
                if let Some(captured) = last.captured {
                    if let Some(count) = hand.get_mut(&captured.kind.unpromoted()) {
                        *count = count.saturating_sub(1);
                    }
                }
            }
            None => {
                self.board[(last.to.x - 1) as usize][(last.to.y - 1) as usize] = None;
                *hand.entry(last.moved.kind).or_insert(0) += 1;
            }
        }
        self.turn = last.moved.color;
        Ok(())
    }

    fn get(&self, square: Square) -> Option<Piece> {
        if !square.is_on_board() {
            return None;
        }
        self.board[(square.x - 1) as usize][(square.y - 1) as usize]
    }

    fn hand_counts(&self, color: Color) -> BTreeMap<Kind, u32> {
        self.hands[color.index()].clone()
    }

    fn turn(&self) -> Color {
        self.turn
    }
}

/// Upper-side squares emptied by each handicap preset
fn handicap_squares(preset: Preset) -> &'static [(u8, u8)] {
    match preset {
        Preset::Hirate | Preset::Other => &[],
        Preset::Lance => &[(1, 1)],
        Preset::RightLance => &[(9, 1)],
        Preset::Bishop => &[(2, 2)],
        Preset::Rook => &[(8, 2)],
        Preset::RookLance => &[(8, 2), (1, 1)],
        Preset::TwoPieces => &[(8, 2), (2, 2)],
        Preset::FourPieces => &[(8, 2), (2, 2), (1, 1), (9, 1)],
        Preset::SixPieces => &[(8, 2), (2, 2), (1, 1), (9, 1), (2, 1), (8, 1)],
        Preset::EightPieces => &[
            (8, 2), (2, 2), (1, 1), (9, 1), (2, 1), (8, 1), (3, 1), (7, 1),
        ],
        Preset::TenPieces => &[
            (8, 2), (2, 2), (1, 1), (9, 1), (2, 1), (8, 1), (3, 1), (7, 1), (4, 1), (6, 1),
        ],
    }
}
