//! Record playback
//!
//! A [`Player`] owns a record, a rules engine holding the live position, the
//! cursor ply and the [`PathStack`] of selected branches. Navigation lives
//! in `navigator`, move input in `editor`, position snapshots in `state`.

pub mod editor;
pub mod navigator;
pub mod path;
pub mod state;

use log::debug;

use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::format::FormatRegistry;
use crate::jkf::{JsonKifu, MinimalNormalizer, MoveFormat, MoveNode, NodeContent, Normalizer};
use crate::readable::renderer::move_to_readable_kifu;
use crate::readable::ReadableEntry;
use crate::shogi::{Piece, RulesEngine, Shogi, Square};

pub use editor::same_move_minimal;
pub use path::{PathFrame, PathStack};

/// Safety valve for `goto` on malformed or cyclic records
pub const GOTO_LIMIT: usize = 10000;

pub struct Player<E: RulesEngine = Shogi> {
    kifu: JsonKifu,
    engine: E,
    tesuu: usize,
    path: PathStack,
    normalizer: Box<dyn Normalizer>,
    config: PlayerConfig,
}

impl Player<Shogi> {
    /// Player at ply 0 of `kifu`, using the bundled shogi engine
    pub fn new(kifu: JsonKifu) -> Result<Self, PlayerError> {
        Player::with_config(kifu, PlayerConfig::default())
    }

    pub fn with_config(kifu: JsonKifu, config: PlayerConfig) -> Result<Self, PlayerError> {
        let engine = Shogi::from_initial(kifu.initial.as_ref()).map_err(PlayerError::Setup)?;
        Player::with_engine(kifu, engine, config)
    }

    /// Detect the notation of `text` among the default formats and load it
    pub fn parse(text: &str) -> Result<Self, PlayerError> {
        let outcome = FormatRegistry::default().parse(text)?;
        Player::new(outcome.kifu)
    }
}

impl<E: RulesEngine> Player<E> {
    /// Player over a caller-supplied engine, which must hold the record's
    /// initial position. An empty record gets its ply-0 placeholder; a first
    /// node holding a move or terminal is `MissingRoot`.
    pub fn with_engine(mut kifu: JsonKifu, engine: E, config: PlayerConfig) -> Result<Self, PlayerError> {
        match kifu.moves.first() {
            None => kifu.moves.push(MoveNode::root()),
            Some(first) if first.content != NodeContent::Root => return Err(PlayerError::MissingRoot),
            Some(_) => {}
        }
        debug!("player created over {} nodes", kifu.node_count());
        Ok(Player {
            kifu,
            engine,
            tesuu: 0,
            path: PathStack::new(),
            normalizer: Box::new(MinimalNormalizer),
            config,
        })
    }

    /// Replace the normalizer run after a new move is grafted
    pub fn with_normalizer<N: Normalizer + 'static>(mut self, normalizer: N) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Current cursor ply
    pub fn tesuu(&self) -> usize {
        self.tesuu
    }

    pub fn kifu(&self) -> &JsonKifu {
        &self.kifu
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn path_stack(&self) -> &PathStack {
        &self.path
    }

    /// Last ply reachable on the selected line
    pub fn get_max_ply(&self) -> Result<usize, PlayerError> {
        self.path.max_ply(&self.kifu)
    }

    /// Node at `ply` on the selected line; past its end is `InvalidPly`
    fn node(&self, ply: usize) -> Result<&MoveNode, PlayerError> {
        self.path
            .lookup(&self.kifu, ply)?
            .ok_or(PlayerError::InvalidPly(ply))
    }

    /// Move recorded at `ply` (cursor when `None`); `None` for the ply-0
    /// placeholder and terminal nodes
    pub fn get_move(&self, ply: impl Into<Option<usize>>) -> Result<Option<&MoveFormat>, PlayerError> {
        let ply = ply.into().unwrap_or(self.tesuu);
        Ok(self.node(ply)?.as_move())
    }

    pub fn get_comments(&self, ply: impl Into<Option<usize>>) -> Result<&[String], PlayerError> {
        let ply = ply.into().unwrap_or(self.tesuu);
        Ok(&self.node(ply)?.comments)
    }

    /// Branches recorded as alternatives to the move after `ply`
    pub fn get_next_fork(&self, ply: impl Into<Option<usize>>) -> Result<&[Vec<MoveNode>], PlayerError> {
        let ply = ply.into().unwrap_or(self.tesuu);
        let next = ply.checked_add(1).ok_or(PlayerError::InvalidPly(ply))?;
        Ok(self
            .path
            .lookup(&self.kifu, next)?
            .map_or(&[][..], |node| node.forks.as_slice()))
    }

    /// Destination of the move at `ply`, if that node is a move
    fn destination(&self, ply: usize) -> Result<Option<Square>, PlayerError> {
        if ply == 0 {
            return Ok(None);
        }
        Ok(self.path.lookup(&self.kifu, ply)?.and_then(|n| n.as_move()).map(|mv| mv.to))
    }

    pub fn get_readable_kifu(&self, ply: impl Into<Option<usize>>) -> Result<String, PlayerError> {
        let ply = ply.into().unwrap_or(self.tesuu);
        let node = self.node(ply)?;
        let previous = if ply > 0 { self.destination(ply - 1)? } else { None };
        Ok(move_to_readable_kifu(node, previous))
    }

    /// Readable first moves of the forks branching off after `ply`
    pub fn get_readable_fork_kifu(&self, ply: impl Into<Option<usize>>) -> Result<Vec<String>, PlayerError> {
        let ply = ply.into().unwrap_or(self.tesuu);
        let previous = self.destination(ply)?;
        Ok(self
            .get_next_fork(ply)?
            .iter()
            .filter_map(|fork| fork.first())
            .map(|node| move_to_readable_kifu(node, previous))
            .collect())
    }

    /// Readable move, forks and comments for every ply of the selected line
    pub fn get_readable_kifu_state(&self) -> Result<Vec<ReadableEntry>, PlayerError> {
        let max = self.get_max_ply()?;
        let mut entries = Vec::with_capacity(max + 1);
        for ply in 0..=max {
            entries.push(ReadableEntry {
                kifu: self.get_readable_kifu(ply)?,
                forks: if ply == 0 { Vec::new() } else { self.get_readable_fork_kifu(ply - 1)? },
                comments: self.get_comments(ply)?.to_vec(),
            });
        }
        Ok(entries)
    }

    pub fn get_board(&self, x: u8, y: u8) -> Option<Piece> {
        self.engine.get(Square::new(x, y))
    }

    /// Serialize the whole record, every fork included, as JKF
    pub fn to_jkf(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.kifu)
    }
}
