use log::debug;

use super::{Player, GOTO_LIMIT};
use crate::error::PlayerError;
use crate::shogi::RulesEngine;

impl<E: RulesEngine> Player<E> {
    /// Step one ply along the selected line.
    ///
    /// Returns `Ok(false)` at the end of the line. Stepping onto a terminal
    /// node advances the cursor without touching the position. If the
    /// engine rejects the move nothing changes.
    pub fn forward(&mut self) -> Result<bool, PlayerError> {
        let next = self.tesuu + 1;
        let node = match self.path.lookup(&self.kifu, next)? {
            Some(node) => node,
            None => return Ok(false),
        };
        if let Some(mv) = node.as_move() {
            self.engine.apply(mv).map_err(PlayerError::IllegalMove)?;
        }
        self.tesuu = next;
        if self.config.trace_navigation {
            debug!("forward to ply {}", self.tesuu);
        }
        Ok(true)
    }

    /// Step one ply back, dropping fork selections made beyond the new
    /// cursor. Returns `Ok(false)` at ply 0.
    pub fn backward(&mut self) -> Result<bool, PlayerError> {
        if self.tesuu == 0 {
            return Ok(false);
        }
        let node = self
            .path
            .lookup(&self.kifu, self.tesuu)?
            .ok_or(PlayerError::InvalidPly(self.tesuu))?;
        if let Some(mv) = node.as_move() {
            self.engine.undo(mv).map_err(PlayerError::IllegalMove)?;
        }
        self.tesuu -= 1;
        self.path.prune(self.tesuu);
        if self.config.trace_navigation {
            debug!("backward to ply {} ({} selected branches)", self.tesuu, self.path.depth() - 1);
        }
        Ok(true)
    }

    /// Walk to `target` on the selected line, stopping early at either end.
    pub fn goto(&mut self, target: usize) -> Result<(), PlayerError> {
        let mut steps = 0;
        while self.tesuu != target {
            if steps == GOTO_LIMIT {
                return Err(PlayerError::IterationOverflow { target, limit: GOTO_LIMIT });
            }
            let moved = if self.tesuu < target {
                self.forward()?
            } else {
                self.backward()?
            };
            if !moved {
                break;
            }
            steps += 1;
        }
        Ok(())
    }

    /// Move the cursor by `delta` plies, clamped at ply 0
    pub fn go(&mut self, delta: isize) -> Result<(), PlayerError> {
        let target = if delta < 0 {
            self.tesuu.saturating_sub(delta.unsigned_abs())
        } else {
            self.tesuu + delta as usize
        };
        self.goto(target)
    }

    /// Select fork `index` of the next node and step into it.
    ///
    /// Returns `Ok(false)`, with nothing changed, when there is no next node,
    /// no such fork, or the fork is empty.
    pub fn fork_and_forward(&mut self, index: usize) -> Result<bool, PlayerError> {
        let next = self.tesuu + 1;
        let fork_count = match self.path.lookup(&self.kifu, next)? {
            Some(node) => node.forks.len(),
            None => return Ok(false),
        };
        if index >= fork_count {
            return Ok(false);
        }
        let frame = self.path.fork_frame(next, index).ok_or(PlayerError::InvalidPly(next))?;
        self.path.push(frame);

        match self.forward() {
            Ok(true) => {
                if self.config.trace_navigation {
                    debug!("took fork {} at ply {}", index, next);
                }
                Ok(true)
            }
            Ok(false) => {
                self.path.pop_selection();
                Ok(false)
            }
            Err(e) => {
                self.path.pop_selection();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::PlayerConfig;
    use crate::jkf::{JsonKifu, MoveFormat, MoveNode, Special};
    use crate::shogi::{Color, Kind, Piece, ShogiError, Square};

    /// Accepts any move and only counts them
    #[derive(Default)]
    struct CountingEngine {
        applied: usize,
    }

    impl RulesEngine for CountingEngine {
        fn apply(&mut self, _mv: &MoveFormat) -> Result<(), ShogiError> {
            self.applied += 1;
            Ok(())
        }

        fn undo(&mut self, _mv: &MoveFormat) -> Result<(), ShogiError> {
            self.applied = self.applied.checked_sub(1).ok_or(ShogiError::NothingToUndo)?;
            Ok(())
        }

        fn get(&self, _square: Square) -> Option<Piece> {
            None
        }

        fn hand_counts(&self, _color: Color) -> BTreeMap<Kind, u32> {
            BTreeMap::new()
        }

        fn turn(&self) -> Color {
            if self.applied % 2 == 0 {
                Color::Black
            } else {
                Color::White
            }
        }
    }

    fn pawn_push(x: u8) -> MoveNode {
        MoveNode::from_move(MoveFormat::board(Square::new(x, 7), Square::new(x, 6)))
    }

    fn counting_player(moves: Vec<MoveNode>) -> Player<CountingEngine> {
        Player::with_engine(JsonKifu::from_moves(moves), CountingEngine::default(), PlayerConfig::default()).unwrap()
    }

    #[test]
    fn test_terminal_node_advances_without_engine() {
        let mut player = counting_player(vec![pawn_push(7), MoveNode::from_special(Special::Resign)]);
        assert!(player.forward().unwrap());
        assert!(player.forward().unwrap());
        assert_eq!(player.tesuu(), 2);
        assert_eq!(player.engine().applied, 1);
        assert!(!player.forward().unwrap());

        assert!(player.backward().unwrap());
        assert_eq!(player.engine().applied, 1);
    }

    #[test]
    fn test_goto_gives_up_after_limit() {
        let moves = (0..GOTO_LIMIT + 5).map(|i| pawn_push((i % 9 + 1) as u8)).collect();
        let mut player = counting_player(moves);

        let err = player.goto(GOTO_LIMIT + 5).unwrap_err();
        assert!(matches!(err, PlayerError::IterationOverflow { limit: GOTO_LIMIT, .. }));
        assert_eq!(player.tesuu(), GOTO_LIMIT);
    }

    #[test]
    fn test_go_clamps_at_zero() {
        let mut player = counting_player(vec![pawn_push(7), pawn_push(3)]);
        player.go(2).unwrap();
        assert_eq!(player.tesuu(), 2);
        player.go(-5).unwrap();
        assert_eq!(player.tesuu(), 0);
        player.go(10).unwrap();
        assert_eq!(player.tesuu(), 2, "stops at the end of the line");
    }

    #[test]
    fn test_fork_and_forward_leaves_empty_fork_unselected() {
        let mut moves = vec![pawn_push(7), pawn_push(3)];
        moves[1].forks.push(Vec::new());
        let mut player = counting_player(moves);
        player.forward().unwrap();

        assert!(!player.fork_and_forward(0).unwrap());
        assert_eq!(player.path_stack().depth(), 1);
        assert_eq!(player.tesuu(), 1);
        assert!(!player.fork_and_forward(1).unwrap());
    }

    #[test]
    fn test_first_node_must_be_placeholder() {
        let mut kifu = JsonKifu::new();
        kifu.moves[0] = pawn_push(7);
        let result = Player::with_engine(kifu, CountingEngine::default(), PlayerConfig::default());
        assert!(matches!(result, Err(PlayerError::MissingRoot)), "ply 0 cannot hold a move");

        let mut kifu = JsonKifu::new();
        kifu.moves[0] = MoveNode::from_special(Special::Resign);
        let result = Player::with_engine(kifu, CountingEngine::default(), PlayerConfig::default());
        assert!(matches!(result, Err(PlayerError::MissingRoot)));

        let mut kifu = JsonKifu::new();
        kifu.moves.clear();
        let player = Player::with_engine(kifu, CountingEngine::default(), PlayerConfig::default()).unwrap();
        assert_eq!(player.kifu().moves.len(), 1, "empty record gets a placeholder");
        assert!(player.get_move(0).unwrap().is_none());
    }
}
