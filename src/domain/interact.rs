/// Tree removal: chop (one cell) and fire (spreading).
///
/// Both act on the cell adjacent to the player in the chosen direction and
/// do nothing unless that cell is a `Tree`.
///
/// ## Scoring asymmetry
///
///   - Chop scores the cleared cell: +1.
///   - Fire never scores the cell it was started on. Every other tree it
///     reaches scores +1 when it burns out.
///
/// ## Fire traversal
///
/// Depth-first over 8-connected trees, driven by an explicit stack so large
/// forests do not exhaust the native call stack. Each frame scans its 3×3
/// block in row-major order. A tree found there is ignited (`Burning`), its
/// own block is scanned in full, then it burns out (`Ground`, +1). Cells go
/// `Tree → Burning → Ground` exactly once, so the walk terminates and never
/// double-counts.

use super::cell::CellState;
use super::entity::{Direction, Position};
use super::grid::Grid;

/// 3×3 scan order, center included (it is never a tree by the time it is scanned).
const BLOCK: [(i32, i32); 9] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),  (0, 0),  (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// One visible transition during a fire, in the order it happened.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Spread {
    Ignite(Position),
    BurnOut { pos: Position, scored: bool },
}

/// Cell the player would act on, if it is a tree.
fn tree_target(grid: &Grid, player: Position, dir: Direction) -> Option<Position> {
    let target = player.step(dir)?;
    match grid.get(target) {
        Some(c) if c.is_tree() => Some(target),
        _ => None,
    }
}

/// Chop the tree next to the player. Returns the cleared cell, or None if
/// there was no tree there (grid untouched). The caller adds one point.
pub fn chop(grid: &mut Grid, player: Position, dir: Direction) -> Option<Position> {
    let target = tree_target(grid, player, dir)?;
    grid.set_cell(target, CellState::Ground).ok()?;
    Some(target)
}

/// Set fire to the tree next to the player and let it spread.
/// Returns every transition in order; empty if there was no tree.
pub fn fire(grid: &mut Grid, player: Position, dir: Direction) -> Vec<Spread> {
    let origin = match tree_target(grid, player, dir) {
        Some(t) => t,
        None => return vec![],
    };

    let mut log = Vec::new();
    if grid.set_cell(origin, CellState::Burning).is_err() {
        return log;
    }
    log.push(Spread::Ignite(origin));

    // (center, next BLOCK index)
    let mut stack: Vec<(Position, usize)> = vec![(origin, 0)];

    while let Some(frame) = stack.last_mut() {
        let (center, next) = *frame;

        if next == BLOCK.len() {
            stack.pop();
            // Only cells ignited by a parent frame score.
            let scored = !stack.is_empty();
            if grid.set_cell(center, CellState::Ground).is_ok() {
                log.push(Spread::BurnOut { pos: center, scored });
            }
            continue;
        }
        frame.1 += 1;

        let (dr, dc) = BLOCK[next];
        let neighbor = match center.offset(dr, dc) {
            Some(n) => n,
            None => continue,
        };
        if grid.get(neighbor) == Some(CellState::Tree)
            && grid.set_cell(neighbor, CellState::Burning).is_ok()
        {
            log.push(Spread::Ignite(neighbor));
            stack.push((neighbor, 0));
        }
    }

    log
}

/// Points earned by a fire.
pub fn fire_points(log: &[Spread]) -> u32 {
    log.iter()
        .filter(|s| matches!(s, Spread::BurnOut { scored: true, .. }))
        .count() as u32
}
