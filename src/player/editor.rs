use log::{debug, info};

use super::Player;
use crate::error::PlayerError;
use crate::jkf::{JsonKifu, MoveFormat, MoveNode};
use crate::player::PathStack;
use crate::shogi::RulesEngine;

/// Whether two moves are the same move for branch matching: same
/// destination, and either the same origin with the same promotion decision
/// or drops of the same piece. Derived fields are ignored.
pub fn same_move_minimal(a: &MoveFormat, b: &MoveFormat) -> bool {
    if a.to != b.to {
        return false;
    }
    match (a.from, b.from) {
        (Some(from_a), Some(from_b)) => from_a == from_b && a.promote == b.promote,
        (None, None) => a.piece == b.piece,
        _ => false,
    }
}

/// Where a new move was attached
enum Graft {
    Append,
    Fork(usize),
}

impl<E: RulesEngine> Player<E> {
    /// Play `candidate` from the cursor.
    ///
    /// Follows the recorded continuation or an existing fork when one holds
    /// the same move, otherwise records the move as a new continuation (at
    /// the end of the line) or a new fork and steps onto it. Returns
    /// `Ok(false)` without changing anything when `candidate` could promote
    /// but does not say whether it does.
    pub fn input_move(&mut self, candidate: MoveFormat) -> Result<bool, PlayerError> {
        let current = self
            .path
            .lookup(&self.kifu, self.tesuu)?
            .ok_or(PlayerError::InvalidPly(self.tesuu))?;
        if current.is_special() {
            return Err(PlayerError::TerminalExtension(self.tesuu));
        }

        if self.needs_promotion_choice(&candidate) {
            debug!("move to {} needs a promotion decision", candidate.to);
            return Ok(false);
        }

        let next = self.tesuu + 1;
        let (continues, fork) = match self.path.lookup(&self.kifu, next)? {
            Some(node) => (
                node.as_move().map_or(false, |mv| same_move_minimal(mv, &candidate)),
                node.forks.iter().position(|branch| {
                    branch
                        .first()
                        .and_then(MoveNode::as_move)
                        .map_or(false, |mv| same_move_minimal(mv, &candidate))
                }),
            ),
            None => (false, None),
        };

        if continues {
            self.forward()?;
            return Ok(true);
        }
        if let Some(index) = fork {
            self.fork_and_forward(index)?;
            return Ok(true);
        }

        self.record_new_move(candidate)?;
        Ok(true)
    }

    fn needs_promotion_choice(&self, candidate: &MoveFormat) -> bool {
        let from = match candidate.from {
            Some(from) if candidate.promote.is_none() => from,
            _ => return false,
        };
        match self.engine.get(from) {
            Some(piece) => {
                piece.color == self.engine.turn()
                    && piece.kind.can_promote()
                    && (from.in_promotion_zone(piece.color) || candidate.to.in_promotion_zone(piece.color))
            }
            None => false,
        }
    }

    /// Graft `candidate` into the record and step onto it. The record and
    /// the position are untouched when any step fails.
    fn record_new_move(&mut self, mut candidate: MoveFormat) -> Result<(), PlayerError> {
        if candidate.color.is_none() {
            candidate.color = Some(self.engine.turn());
        }
        if candidate.piece.is_none() {
            if let Some(from) = candidate.from {
                candidate.piece = self.engine.get(from).map(|p| p.kind);
            }
        }

        // probe
        self.engine.apply(&candidate).map_err(PlayerError::IllegalMove)?;

        let edited = self.grafted_record(candidate.clone());
        self.engine.undo(&candidate).map_err(PlayerError::IllegalMove)?;
        let (kifu, graft) = edited?;
        self.kifu = kifu;

        match graft {
            Graft::Append => {
                info!("appended move to {} at ply {}", candidate.to, self.tesuu + 1);
                self.forward()?;
            }
            Graft::Fork(index) => {
                info!("added fork {} at ply {}", index, self.tesuu + 1);
                self.fork_and_forward(index)?;
            }
        }
        Ok(())
    }

    /// Copy of the record with `mv` attached after the cursor, normalized
    fn grafted_record(&self, mv: MoveFormat) -> Result<(JsonKifu, Graft), PlayerError> {
        let mut kifu = self.kifu.clone();
        let max = self.path.max_ply(&kifu)?;
        let graft = attach(&mut kifu, &self.path, self.tesuu, max, MoveNode::from_move(mv))?;
        self.normalizer.normalize_minimal(&mut kifu).map_err(PlayerError::Normalize)?;
        Ok((kifu, graft))
    }
}

fn attach(
    kifu: &mut JsonKifu,
    path: &PathStack,
    tesuu: usize,
    max_ply: usize,
    node: MoveNode,
) -> Result<Graft, PlayerError> {
    if tesuu < max_ply {
        let next = tesuu + 1;
        let (frame, offset) = path.locate(next).ok_or(PlayerError::InvalidPly(next))?;
        let target = kifu
            .branch_mut(&frame.branch)
            .and_then(|branch| branch.get_mut(offset))
            .ok_or(PlayerError::InvalidPly(next))?;
        target.forks.push(vec![node]);
        Ok(Graft::Fork(target.forks.len() - 1))
    } else {
        let top = path.top().ok_or(PlayerError::InvalidPly(tesuu))?;
        kifu.branch_mut(&top.branch)
            .ok_or(PlayerError::InvalidPly(tesuu))?
            .push(node);
        Ok(Graft::Append)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shogi::{Kind, Square};

    fn board(from: (u8, u8), to: (u8, u8)) -> MoveFormat {
        MoveFormat::board(Square::new(from.0, from.1), Square::new(to.0, to.1))
    }

    #[test]
    fn test_same_move_ignores_derived_fields() {
        let mut recorded = board((7, 7), (7, 6));
        recorded.piece = Some(Kind::Pawn);
        recorded.relative = Some("U".to_string());
        assert!(same_move_minimal(&recorded, &board((7, 7), (7, 6))));
        assert!(!same_move_minimal(&recorded, &board((7, 7), (7, 5))));
    }

    #[test]
    fn test_same_move_promotion_decision_must_match() {
        let plain = board((8, 8), (2, 2));
        assert!(!same_move_minimal(&plain.clone().with_promote(true), &plain));
        assert!(!same_move_minimal(&plain.clone().with_promote(false), &plain));
        assert!(same_move_minimal(&plain.clone().with_promote(true), &plain.with_promote(true)));
    }

    #[test]
    fn test_same_move_drops() {
        let to = Square::new(5, 5);
        assert!(same_move_minimal(&MoveFormat::drop(to, Kind::Bishop), &MoveFormat::drop(to, Kind::Bishop)));
        assert!(!same_move_minimal(&MoveFormat::drop(to, Kind::Bishop), &MoveFormat::drop(to, Kind::Gold)));
        assert!(!same_move_minimal(&MoveFormat::drop(to, Kind::Bishop), &board((5, 7), (5, 5))));
    }
}
