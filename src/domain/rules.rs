/// Movement rules, truth-table driven.
///
/// Pure functions operating on the grid, with no side effects.
/// These encode "what is legal" without performing the action.
/// The same predicate governs the player and every agent.
///
/// ## Movement Truth Table
///
/// Evaluated top to bottom, first match wins.
/// ┌──────────────────────────────┬─────────┬──────────────────┐
/// │ Condition                     │ Allow?  │ Notes            │
/// ├──────────────────────────────┼─────────┼──────────────────┤
/// │ Dest cell is Exit             │ ALLOW   │ ends the session │
/// │ Dest cell is Tree             │ DENY    │ chop or burn it  │
/// │ Dest row/col outside interior │ DENY    │ border or beyond │
/// │ Otherwise (Ground / Burning)  │ ALLOW   │                  │
/// └──────────────────────────────┴─────────┴──────────────────┘

use super::cell::CellState;
use super::entity::{Direction, Position};
use super::error::{GameError, Result};
use super::grid::Grid;

/// Can an entity step onto `pos`? See truth table above.
pub fn is_legal_move(grid: &Grid, pos: Position) -> bool {
    match grid.get(pos) {
        Some(CellState::Exit) => true,
        Some(c) if c.is_blocking() => false,
        Some(_) => grid.is_interior(pos),
        None => false,
    }
}

/// Resolve a one-cell move from `from` in `dir`.
/// Returns the destination, or `IllegalMove` naming the rejected cell.
pub fn try_move(grid: &Grid, from: Position, dir: Direction) -> Result<Position> {
    let (dr, dc) = dir.delta();
    let illegal = GameError::IllegalMove {
        row: (from.row as i64 + dr as i64).max(0) as usize,
        col: (from.col as i64 + dc as i64).max(0) as usize,
    };
    match from.step(dir) {
        Some(to) if is_legal_move(grid, to) => Ok(to),
        _ => Err(illegal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Grid {
        Grid::from_diagram(&[
            "######",
            "#.^..#",
            "#*...#",
            "#...E#",
            "#....#",
            "######",
        ])
    }

    #[test]
    fn ground_is_legal() {
        assert!(is_legal_move(&board(), Position::new(1, 1)));
        assert!(is_legal_move(&board(), Position::new(4, 4)));
    }

    #[test]
    fn burning_is_legal() {
        assert!(is_legal_move(&board(), Position::new(2, 1)));
    }

    #[test]
    fn exit_is_legal() {
        assert!(is_legal_move(&board(), Position::new(3, 4)));
    }

    #[test]
    fn tree_is_illegal() {
        assert!(!is_legal_move(&board(), Position::new(1, 2)));
    }

    #[test]
    fn every_border_cell_is_illegal() {
        let g = board();
        for (p, c) in g.iter() {
            if c == CellState::Border {
                assert!(!is_legal_move(&g, p), "border at {p:?}");
            }
        }
    }

    #[test]
    fn beyond_the_board_is_illegal() {
        assert!(!is_legal_move(&board(), Position::new(9, 9)));
        assert!(!is_legal_move(&board(), Position::new(2, 6)));
    }

    #[test]
    fn try_move_returns_destination() {
        let g = board();
        assert_eq!(
            try_move(&g, Position::new(1, 1), Direction::Down),
            Ok(Position::new(2, 1))
        );
        assert_eq!(
            try_move(&g, Position::new(3, 3), Direction::Right),
            Ok(Position::new(3, 4))
        );
    }

    #[test]
    fn try_move_names_rejected_cell() {
        let g = board();
        assert_eq!(
            try_move(&g, Position::new(1, 1), Direction::Right),
            Err(GameError::IllegalMove { row: 1, col: 2 })
        );
        assert_eq!(
            try_move(&g, Position::new(1, 1), Direction::Up),
            Err(GameError::IllegalMove { row: 0, col: 1 })
        );
    }
}
