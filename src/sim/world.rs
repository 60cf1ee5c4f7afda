/// Session: the complete state of one match.
///
/// Owns the grid, the player, the agent roster and the counters. Nothing
/// else holds on to any of these between ticks; the renderer gets a
/// borrowed `Snapshot` and must not mutate.
///
/// ## Counters
///   - `energy` starts at `2 × side` and drops by 1 per accepted move only.
///   - `score` grows through chop / fire.
///   - `high_score` is the persisted best, loaded once at startup.

use rand::Rng;
use tracing::debug;

use crate::domain::ai;
use crate::domain::cell::CellState;
use crate::domain::entity::{Agent, Player, Position};
use crate::domain::error::{GameError, Result};
use crate::domain::grid::{Grid, BORDER};

pub const MIN_DIMENSION: usize = 10;
pub const MAX_DIMENSION: usize = 50;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    LostEnergy,
    LostInfected,
    Won,
}

impl Phase {
    pub fn is_over(self) -> bool {
        self != Phase::Playing
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    pub grid: Grid,
    pub player: Player,
    pub agents: Vec<Agent>,
    pub energy: i32,
    pub max_energy: i32,
    pub score: u32,
    pub high_score: u32,
    pub phase: Phase,
    pub tick: u64,
}

/// Read-only view handed to the presentation layer each tick.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub player: Position,
    pub agents: &'a [Agent],
    pub energy: i32,
    pub max_energy: i32,
    pub score: u32,
    pub high_score: u32,
    pub phase: Phase,
}

/// Accept a board dimension typed by the player (10-50).
pub fn validate_dimension(n: i64) -> Result<usize> {
    if (MIN_DIMENSION as i64..=MAX_DIMENSION as i64).contains(&n) {
        Ok(n as usize)
    } else {
        Err(GameError::InvalidDimension(n))
    }
}

// ── Construction ──

impl Session {
    /// Start a match on a freshly generated board.
    ///
    /// `dimension` is the player's choice; one border cell is added to get the
    /// full side length. The grid is drawn from `rng` before the agents.
    pub fn new<R: Rng>(dimension: usize, high_score: u32, rng: &mut R) -> Result<Self> {
        let dimension = validate_dimension(dimension as i64)?;
        let side = dimension + BORDER;
        let grid = Grid::generate(side, rng);
        let agents = ai::spawn_agents(side, rng);
        debug!(
            side,
            exit = ?grid.exit(),
            trees = grid.count(CellState::Tree),
            agents = ?agents.iter().map(|a| a.pos).collect::<Vec<_>>(),
            "board generated"
        );
        Ok(Self::with_parts(grid, agents, high_score))
    }

    /// Assemble a session from prepared parts. Energy derives from the grid size.
    pub fn with_parts(grid: Grid, agents: Vec<Agent>, high_score: u32) -> Self {
        let max_energy = 2 * grid.side() as i32;
        Session {
            grid,
            player: Player::new(),
            agents,
            energy: max_energy,
            max_energy,
            score: 0,
            high_score,
            phase: Phase::Playing,
            tick: 0,
        }
    }
}

// ── Queries ──

impl Session {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            player: self.player.pos,
            agents: &self.agents,
            energy: self.energy,
            max_energy: self.max_energy,
            score: self.score,
            high_score: self.high_score,
            phase: self.phase,
        }
    }

    /// First agent standing on the player's cell, if any.
    pub fn infecting_agent(&self) -> Option<usize> {
        self.agents
            .iter()
            .find(|a| a.pos == self.player.pos)
            .map(|a| a.id)
    }

    /// Has this session beaten the persisted best?
    pub fn is_new_high_score(&self) -> bool {
        self.score > self.high_score
    }
}
