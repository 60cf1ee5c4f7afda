/// Agent AI: greedy one-step chase, no pathfinding memory.
///
/// Each tick every agent picks exactly one candidate step, by priority:
///   1. player is to the right  → Right
///   2. player is below         → Down
///   3. player is to the left   → Left
///   4. player is above         → Up
///
/// The first applicable branch is the only one tried. If that step is
/// blocked (tree, border, or another agent) the agent stays put this tick.
/// An agent on the player's cell has no branch and stays too.
///
/// Agents update sequentially in roster order. An agent is only blocked by
/// agents that have not had their turn yet (later in the roster, at their
/// old cells). Agents that already moved this tick are not checked, so two
/// agents can end a tick on the same cell.

use rand::Rng;

use super::entity::{Agent, Direction, Position};
use super::grid::Grid;
use super::rules;

/// Number of infected hikers per session.
pub const AGENT_COUNT: usize = 4;

/// Place `AGENT_COUNT` agents uniformly in rows/cols `[2, side - 2]`.
///
/// Cells are not filtered: an agent may start on a tree or share a cell
/// with another agent. The movement rules only look at destinations.
pub fn spawn_agents<R: Rng>(side: usize, rng: &mut R) -> Vec<Agent> {
    (0..AGENT_COUNT)
        .map(|id| {
            let row = rng.gen_range(2..=side - 2);
            let col = rng.gen_range(2..=side - 2);
            Agent::new(id, Position::new(row, col))
        })
        .collect()
}

/// Which way does an agent at `from` want to go? See priority list above.
pub fn find_direction(from: Position, player: Position) -> Option<Direction> {
    if player.col > from.col {
        Some(Direction::Right)
    } else if player.row > from.row {
        Some(Direction::Down)
    } else if player.col < from.col {
        Some(Direction::Left)
    } else if player.row < from.row {
        Some(Direction::Up)
    } else {
        None
    }
}

/// A step one agent actually took this tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AgentStep {
    pub id: usize,
    pub from: Position,
    pub to: Position,
}

/// Advance every agent one tick. Returns the moves that were applied, in order.
pub fn advance_agents(grid: &Grid, agents: &mut [Agent], player: Position) -> Vec<AgentStep> {
    let mut steps = Vec::with_capacity(agents.len());

    for i in 0..agents.len() {
        let from = agents[i].pos;
        let target = match find_direction(from, player).and_then(|d| from.step(d)) {
            Some(t) => t,
            None => continue,
        };

        if !rules::is_legal_move(grid, target) {
            continue;
        }

        let occupied = agents[i + 1..].iter().any(|other| other.pos == target);
        if occupied {
            continue;
        }

        agents[i].pos = target;
        steps.push(AgentStep { id: agents[i].id, from, to: target });
    }

    steps
}
