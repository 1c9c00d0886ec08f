use super::{JsonKifu, MoveNode};

/// Address of a branch inside a record.
///
/// Each hop is `(node index, fork index)`: start at the main line, take the
/// node at `node index` of the current branch and descend into its fork at
/// `fork index`. The empty path is the main line. Nodes never point back at
/// their parents; a path is all that is needed to find a branch again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchPath(Vec<(usize, usize)>);

impl BranchPath {
    pub fn main_line() -> Self {
        BranchPath(Vec::new())
    }

    /// Path of fork `fork` of the node at `node` in this branch
    pub fn child(&self, node: usize, fork: usize) -> Self {
        let mut hops = self.0.clone();
        hops.push((node, fork));
        BranchPath(hops)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn hops(&self) -> &[(usize, usize)] {
        &self.0
    }
}

impl JsonKifu {
    /// Branch addressed by `path`, or `None` if any hop is dangling
    pub fn branch(&self, path: &BranchPath) -> Option<&[MoveNode]> {
        let mut branch: &[MoveNode] = &self.moves;
        for &(node, fork) in path.hops() {
            branch = branch.get(node)?.forks.get(fork)?;
        }
        Some(branch)
    }

    pub fn branch_mut(&mut self, path: &BranchPath) -> Option<&mut Vec<MoveNode>> {
        let mut branch = &mut self.moves;
        for &(node, fork) in path.hops() {
            branch = branch.get_mut(node)?.forks.get_mut(fork)?;
        }
        Some(branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jkf::MoveFormat;
    use crate::shogi::Square;

    fn node(from: (u8, u8), to: (u8, u8)) -> MoveNode {
        MoveNode::from_move(MoveFormat::board(Square::new(from.0, from.1), Square::new(to.0, to.1)))
    }

    #[test]
    fn test_branch_resolution() {
        let mut kifu = JsonKifu::from_moves(vec![node((7, 7), (7, 6)), node((3, 3), (3, 4))]);
        kifu.moves[2].forks.push(vec![node((8, 3), (8, 4)), node((2, 7), (2, 6))]);

        let main = BranchPath::main_line();
        assert_eq!(kifu.branch(&main).map(|b| b.len()), Some(3));

        let fork = main.child(2, 0);
        assert_eq!(fork.depth(), 1);
        assert_eq!(kifu.branch(&fork).map(|b| b.len()), Some(2));

        assert!(kifu.branch(&main.child(2, 1)).is_none(), "no second fork");
        assert!(kifu.branch(&main.child(7, 0)).is_none(), "no node 7");

        kifu.branch_mut(&fork).expect("fork exists").push(node((8, 4), (8, 5)));
        assert_eq!(kifu.branch(&fork).map(|b| b.len()), Some(3));
    }
}
