/// Grid: the square forest board.
///
/// ## Layout
///
///   - Outer ring (row/col 0 and `side - 1`) is always `Border`.
///   - Interior cells are `Tree` or `Ground`, a fair coin each.
///   - Exactly one `Exit`, on the rightmost interior column (`side - 2`)
///     at a random row in `[2, side - 2]`.
///   - The player's start cell (1, 1) is forced to `Ground`.
///
/// Only the interaction engine mutates cells after generation.

use rand::Rng;

use super::cell::CellState;
use super::entity::{Player, Position};
use super::error::{GameError, Result};

/// Width of the frame around the playable area.
pub const BORDER: usize = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<CellState>>,
    side: usize,
    exit: Position,
}

impl Grid {
    /// Build a fresh board of `side × side` cells (border included).
    ///
    /// `side` must be at least 4 so the exit row range `[2, side - 2]`
    /// is non-empty; the session guarantees this via dimension validation.
    pub fn generate<R: Rng>(side: usize, rng: &mut R) -> Self {
        let mut cells = vec![vec![CellState::Border; side]; side];

        for row in BORDER..side - BORDER {
            for col in BORDER..side - BORDER {
                cells[row][col] = if rng.gen_bool(0.5) {
                    CellState::Tree
                } else {
                    CellState::Ground
                };
            }
        }

        let exit = Position::new(rng.gen_range(2..=side - 2), side - 2);
        cells[exit.row][exit.col] = CellState::Exit;

        let start = Player::START;
        cells[start.row][start.col] = CellState::Ground;

        Grid { cells, side, exit }
    }

    /// Full side length, border included.
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    /// Bounds-checked read.
    pub fn get(&self, pos: Position) -> Option<CellState> {
        self.cells.get(pos.row).and_then(|r| r.get(pos.col)).copied()
    }

    /// Bounds-checked read with a typed error.
    pub fn try_cell(&self, pos: Position) -> Result<CellState> {
        self.get(pos).ok_or(GameError::OutOfRange {
            row: pos.row,
            col: pos.col,
            side: self.side,
        })
    }

    /// Read a cell the caller already validated.
    /// Panics on out-of-range access: that is a broken invariant, not a game state.
    #[inline]
    pub fn cell(&self, pos: Position) -> CellState {
        self.cells[pos.row][pos.col]
    }

    /// Overwrite a cell. Used by the interaction engine only.
    pub fn set_cell(&mut self, pos: Position, state: CellState) -> Result<()> {
        let side = self.side;
        let slot = self
            .cells
            .get_mut(pos.row)
            .and_then(|r| r.get_mut(pos.col))
            .ok_or(GameError::OutOfRange { row: pos.row, col: pos.col, side })?;
        *slot = state;
        Ok(())
    }

    /// Is `pos` inside the playable area (border excluded)?
    pub fn is_interior(&self, pos: Position) -> bool {
        let lo = BORDER;
        let hi = self.side - 1 - BORDER;
        (lo..=hi).contains(&pos.row) && (lo..=hi).contains(&pos.col)
    }

    /// Row-major iterator over every cell.
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellState)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &c)| (Position::new(row, col), c))
        })
    }

    /// Number of cells currently in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.iter().filter(|&(_, c)| c == state).count()
    }
}

// ── Test fixtures ──

#[cfg(test)]
impl Grid {
    /// Build a grid from a diagram.
    /// Legend:  '#'=Border  '^'=Tree  '.'=Ground  '*'=Burning  'E'=Exit
    pub fn from_diagram(rows: &[&str]) -> Self {
        let side = rows.len();
        let mut cells = vec![vec![CellState::Border; side]; side];
        let mut exit = Position::new(0, 0);
        for (row, line) in rows.iter().enumerate() {
            assert_eq!(line.chars().count(), side, "diagram must be square");
            for (col, ch) in line.chars().enumerate() {
                cells[row][col] = match ch {
                    '#' => CellState::Border,
                    '^' => CellState::Tree,
                    '*' => CellState::Burning,
                    'E' => {
                        exit = Position::new(row, col);
                        CellState::Exit
                    }
                    _ => CellState::Ground,
                };
            }
        }
        Grid { cells, side, exit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ring(side: usize) -> impl Iterator<Item = Position> {
        (0..side).flat_map(move |i| {
            [
                Position::new(0, i),
                Position::new(side - 1, i),
                Position::new(i, 0),
                Position::new(i, side - 1),
            ]
        })
    }

    #[test]
    fn generated_border_is_intact() {
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let g = Grid::generate(11, &mut rng);
            for p in ring(11) {
                assert_eq!(g.cell(p), CellState::Border, "seed {seed} at {p:?}");
            }
        }
    }

    #[test]
    fn generated_exit_is_unique_on_last_interior_column() {
        for side in [11, 21, 51] {
            for seed in 0..30 {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let g = Grid::generate(side, &mut rng);
                assert_eq!(g.count(CellState::Exit), 1);
                let exit = g.exit();
                assert_eq!(g.cell(exit), CellState::Exit);
                assert_eq!(exit.col, side - 2);
                assert!((2..=side - 2).contains(&exit.row));
            }
        }
    }

    #[test]
    fn generated_start_is_ground() {
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let g = Grid::generate(11, &mut rng);
            assert_eq!(g.cell(Player::START), CellState::Ground);
        }
    }

    #[test]
    fn generated_interior_is_trees_and_ground() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let g = Grid::generate(31, &mut rng);
        for (p, c) in g.iter() {
            if g.is_interior(p) && c != CellState::Exit {
                assert!(matches!(c, CellState::Tree | CellState::Ground));
            }
        }
        // Fair coin over 841 cells: both kinds show up in quantity.
        assert!(g.count(CellState::Tree) > 200);
        assert!(g.count(CellState::Ground) > 200);
    }

    #[test]
    fn same_seed_same_board() {
        let a = Grid::generate(21, &mut ChaCha8Rng::seed_from_u64(99));
        let b = Grid::generate(21, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_access_is_reported() {
        let g = Grid::from_diagram(&[
            "####",
            "#..#",
            "#.E#",
            "####",
        ]);
        assert_eq!(g.get(Position::new(4, 0)), None);
        assert_eq!(
            g.try_cell(Position::new(1, 9)),
            Err(GameError::OutOfRange { row: 1, col: 9, side: 4 })
        );
        assert_eq!(g.try_cell(Position::new(2, 2)), Ok(CellState::Exit));
    }

    #[test]
    fn set_cell_writes_and_rejects_outside() {
        let mut g = Grid::from_diagram(&[
            "####",
            "#.^#",
            "#.E#",
            "####",
        ]);
        g.set_cell(Position::new(1, 2), CellState::Ground).unwrap();
        assert_eq!(g.cell(Position::new(1, 2)), CellState::Ground);
        assert!(g.set_cell(Position::new(0, 4), CellState::Tree).is_err());
    }

    #[test]
    fn interior_excludes_ring() {
        let g = Grid::from_diagram(&[
            "#####",
            "#...#",
            "#...#",
            "#..E#",
            "#####",
        ]);
        assert!(g.is_interior(Position::new(1, 1)));
        assert!(g.is_interior(Position::new(3, 3)));
        assert!(!g.is_interior(Position::new(0, 2)));
        assert!(!g.is_interior(Position::new(2, 4)));
    }
}
