/// Cell states and their properties.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellState {
    Border,   // Outer ring, never passable
    Tree,     // Blocks movement, can be chopped or burned
    Ground,   // Walkable
    Burning,  // Transient state during fire spread, walkable
    Exit,     // Session ends in victory when the player stands here
}

impl CellState {
    /// Does this cell block movement by itself?
    pub fn is_blocking(self) -> bool {
        matches!(self, CellState::Border | CellState::Tree)
    }

    /// Can this cell be chopped or set alight?
    pub fn is_tree(self) -> bool {
        matches!(self, CellState::Tree)
    }

    pub fn is_exit(self) -> bool {
        matches!(self, CellState::Exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_cells() {
        assert!(CellState::Border.is_blocking());
        assert!(CellState::Tree.is_blocking());
        assert!(!CellState::Ground.is_blocking());
        assert!(!CellState::Burning.is_blocking());
        assert!(!CellState::Exit.is_blocking());
    }

    #[test]
    fn only_trees_are_trees() {
        assert!(CellState::Tree.is_tree());
        assert!(!CellState::Burning.is_tree());
        assert!(!CellState::Border.is_tree());
    }
}
