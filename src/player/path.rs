use crate::error::PlayerError;
use crate::jkf::{BranchPath, JsonKifu, MoveNode};

/// A selected branch and the ply its first node sits at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFrame {
    pub start_ply: usize,
    pub branch: BranchPath,
}

/// Which branch is selected at each point of divergence on the way to the
/// cursor.
///
/// Frame 0 covers the main line from ply 0 and is never removed. Choosing a
/// fork pushes a frame starting at the fork's ply; stepping back before
/// that ply drops the frame again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStack {
    frames: Vec<PathFrame>,
}

impl PathStack {
    pub fn new() -> Self {
        PathStack {
            frames: vec![PathFrame { start_ply: 0, branch: BranchPath::main_line() }],
        }
    }

    pub fn frames(&self) -> &[PathFrame] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&PathFrame> {
        self.frames.last()
    }

    /// Frame owning `ply` and the offset of `ply` within its branch. The
    /// most recently pushed frame that starts at or before `ply` wins.
    pub fn locate(&self, ply: usize) -> Option<(&PathFrame, usize)> {
        self.frames
            .iter()
            .rev()
            .find(|frame| frame.start_ply <= ply)
            .map(|frame| (frame, ply - frame.start_ply))
    }

    /// Node at `ply` on the selected line, `None` past the end of the line
    pub fn lookup<'a>(&self, kifu: &'a JsonKifu, ply: usize) -> Result<Option<&'a MoveNode>, PlayerError> {
        let (frame, offset) = self.locate(ply).ok_or(PlayerError::InvalidPly(ply))?;
        let branch = kifu.branch(&frame.branch).ok_or(PlayerError::InvalidPly(ply))?;
        Ok(branch.get(offset))
    }

    /// Last ply of the selected line
    pub fn max_ply(&self, kifu: &JsonKifu) -> Result<usize, PlayerError> {
        let top = self.top().ok_or(PlayerError::InvalidPly(0))?;
        let branch = kifu.branch(&top.branch).ok_or(PlayerError::InvalidPly(top.start_ply))?;
        Ok((top.start_ply + branch.len()).saturating_sub(1))
    }

    /// Frame selecting fork `index` of the node at `ply`
    pub fn fork_frame(&self, ply: usize, index: usize) -> Option<PathFrame> {
        let (frame, offset) = self.locate(ply)?;
        Some(PathFrame { start_ply: ply, branch: frame.branch.child(offset, index) })
    }

    pub fn push(&mut self, frame: PathFrame) {
        self.frames.push(frame);
    }

    /// Remove the most recent fork selection. Frame 0 stays.
    pub fn pop_selection(&mut self) -> Option<PathFrame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Forget selections whose branch point lies beyond `ply`
    pub fn prune(&mut self, ply: usize) {
        self.frames.retain(|frame| frame.start_ply <= ply);
    }
}

impl Default for PathStack {
    fn default() -> Self {
        Self::new()
    }
}
