/// The step function: advances the session by one tick.
///
/// Processing order:
///   1. Player intent (move, chop or fire)
///   2. Agent movement
///   3. Terminal check: energy → infection → exit
///
/// An illegal move leaves the player where they are and costs no energy, but
/// the tick still runs: agents advance and the terminal check applies.
/// Chop and fire cost no energy either.

use tracing::{debug, info};

use crate::domain::ai;
use crate::domain::entity::{Direction, Intent};
use crate::domain::error::{GameError, Result};
use crate::domain::interact::{self, Spread};
use crate::domain::rules;
use super::event::GameEvent;
use super::world::{Phase, Session};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(session: &mut Session, intent: Intent) -> Result<Vec<GameEvent>> {
    if session.phase.is_over() { return Ok(vec![]); }

    let mut events: Vec<GameEvent> = Vec::new();

    match intent {
        Intent::Move(dir) => resolve_player_move(session, dir, &mut events),
        Intent::Chop(dir) => resolve_chop(session, dir, &mut events),
        Intent::Fire(dir) => resolve_fire(session, dir, &mut events),
    }

    session.tick += 1;
    resolve_agent_movement(session, &mut events);
    resolve_terminal(session, &mut events)?;

    Ok(events)
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn resolve_player_move(session: &mut Session, dir: Direction, events: &mut Vec<GameEvent>) {
    let from = session.player.pos;
    match rules::try_move(&session.grid, from, dir) {
        Ok(to) => {
            session.player.pos = to;
            session.energy -= 1;
            debug!(?from, ?to, energy = session.energy, "player moved");
            events.push(GameEvent::PlayerMoved { from, to });
        }
        Err(GameError::IllegalMove { row, col }) => {
            debug!(?from, row, col, "move blocked");
            events.push(GameEvent::MoveBlocked { row, col });
        }
        Err(e) => debug!(?from, error = %e, "move rejected"),
    }
}

fn resolve_chop(session: &mut Session, dir: Direction, events: &mut Vec<GameEvent>) {
    if let Some(pos) = interact::chop(&mut session.grid, session.player.pos, dir) {
        session.score += 1;
        debug!(?pos, score = session.score, "tree chopped");
        events.push(GameEvent::TreeChopped { pos });
    }
}

fn resolve_fire(session: &mut Session, dir: Direction, events: &mut Vec<GameEvent>) {
    let log = interact::fire(&mut session.grid, session.player.pos, dir);
    if log.is_empty() { return; }

    let points = interact::fire_points(&log);
    session.score += points;
    debug!(cells = log.len() / 2, points, score = session.score, "fire burned out");

    events.extend(log.into_iter().map(|s| match s {
        Spread::Ignite(pos) => GameEvent::Ignited { pos },
        Spread::BurnOut { pos, scored } => GameEvent::BurnedOut { pos, scored },
    }));
}

// ══════════════════════════════════════════════════════════════
// Agents
// ══════════════════════════════════════════════════════════════

fn resolve_agent_movement(session: &mut Session, events: &mut Vec<GameEvent>) {
    let steps = ai::advance_agents(&session.grid, &mut session.agents, session.player.pos);
    for s in steps {
        debug!(id = s.id, from = ?s.from, to = ?s.to, "agent moved");
        events.push(GameEvent::AgentMoved { id: s.id, from: s.from, to: s.to });
    }
}

// ══════════════════════════════════════════════════════════════
// Win / lose check
// ══════════════════════════════════════════════════════════════

fn resolve_terminal(session: &mut Session, events: &mut Vec<GameEvent>) -> Result<()> {
    let here = session.grid.try_cell(session.player.pos)?;

    if session.energy <= 0 {
        session.phase = Phase::LostEnergy;
        events.push(GameEvent::EnergyDepleted);
    } else if let Some(id) = session.infecting_agent() {
        session.phase = Phase::LostInfected;
        events.push(GameEvent::PlayerInfected { id });
    } else if here.is_exit() {
        session.phase = Phase::Won;
        events.push(GameEvent::Escaped);
    }

    if session.phase.is_over() {
        info!(phase = ?session.phase, score = session.score, tick = session.tick, "session over");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellState;
    use crate::domain::entity::{Agent, Position};
    use crate::domain::grid::Grid;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    /// 11×11 board (dimension 10) with the given agent positions.
    fn session_with(rows: &[&str], agents: &[(usize, usize)]) -> Session {
        let grid = Grid::from_diagram(rows);
        let agents = agents
            .iter()
            .enumerate()
            .map(|(i, &(r, c))| Agent::new(i, p(r, c)))
            .collect();
        Session::with_parts(grid, agents, 0)
    }

    const BOARD: [&str; 11] = [
        "###########",
        "#.^.......#",
        "#.........#",
        "#.........#",
        "#........E#",
        "#.........#",
        "#^^.......#",
        "#^^.......#",
        "#^^.......#",
        "#.^.......#",
        "###########",
    ];

    fn parked() -> Session {
        // Agent sits at (9,1) boxed in by trees above and to the right.
        session_with(&BOARD, &[(9, 1)])
    }

    // ── Energy ──

    #[test]
    fn accepted_move_costs_one_energy() {
        let mut s = parked();
        let events = step(&mut s, Intent::Move(Direction::Down)).unwrap();
        assert_eq!(s.player.pos, p(2, 1));
        assert_eq!(s.energy, 21);
        assert_eq!(events[0], GameEvent::PlayerMoved { from: p(1, 1), to: p(2, 1) });
    }

    #[test]
    fn blocked_move_costs_nothing_but_agents_advance() {
        let mut s = session_with(&BOARD, &[(5, 5)]);
        let events = step(&mut s, Intent::Move(Direction::Right)).unwrap();
        assert_eq!(events[0], GameEvent::MoveBlocked { row: 1, col: 2 });
        assert_eq!(s.player.pos, p(1, 1));
        assert_eq!(s.energy, 22);
        assert_eq!(s.tick, 1);
        assert_eq!(s.agents[0].pos, p(5, 4));
        assert!(events.contains(&GameEvent::AgentMoved { id: 0, from: p(5, 5), to: p(5, 4) }));

        // Border above and to the left.
        let events = step(&mut s, Intent::Move(Direction::Up)).unwrap();
        assert_eq!(events[0], GameEvent::MoveBlocked { row: 0, col: 1 });
        step(&mut s, Intent::Move(Direction::Left)).unwrap();
        assert_eq!(s.energy, 22);
        assert_eq!(s.agents[0].pos, p(5, 2));
    }

    #[test]
    fn blocked_move_can_still_end_in_infection() {
        let mut s = session_with(&BOARD, &[(1, 3)]);
        // Player bumps the tree at (1,2), which also blocks the agent at (1,3).
        step(&mut s, Intent::Move(Direction::Right)).unwrap();
        assert_eq!(s.phase, Phase::Playing);

        // Player bumps the border; the agent below steps onto them.
        let mut s = session_with(&BOARD, &[(2, 1)]);
        let events = step(&mut s, Intent::Move(Direction::Up)).unwrap();
        assert_eq!(s.player.pos, p(1, 1));
        assert_eq!(s.phase, Phase::LostInfected);
        assert_eq!(events.last(), Some(&GameEvent::PlayerInfected { id: 0 }));
    }

    #[test]
    fn energy_runs_out() {
        let mut s = parked();
        s.energy = 2;
        step(&mut s, Intent::Move(Direction::Down)).unwrap();
        assert_eq!(s.phase, Phase::Playing);
        let events = step(&mut s, Intent::Move(Direction::Up)).unwrap();
        assert_eq!(s.energy, 0);
        assert_eq!(s.phase, Phase::LostEnergy);
        assert_eq!(events.last(), Some(&GameEvent::EnergyDepleted));
    }

    #[test]
    fn energy_beats_exit() {
        let mut s = parked();
        s.player.pos = p(4, 8);
        s.energy = 1;
        step(&mut s, Intent::Move(Direction::Right)).unwrap();
        assert_eq!(s.phase, Phase::LostEnergy);
    }

    // ── Chop / fire ──

    #[test]
    fn chop_right_onto_tree() {
        let mut s = parked();
        let events = step(&mut s, Intent::Chop(Direction::Right)).unwrap();
        assert_eq!(s.score, 1);
        assert_eq!(s.grid.cell(p(1, 2)), CellState::Ground);
        assert_eq!(s.energy, 22);
        assert_eq!(s.tick, 1);
        assert!(events.contains(&GameEvent::TreeChopped { pos: p(1, 2) }));
    }

    #[test]
    fn chop_at_nothing_changes_nothing() {
        let mut s = parked();
        let grid = s.grid.clone();
        let events = step(&mut s, Intent::Chop(Direction::Down)).unwrap();
        assert_eq!(s.score, 0);
        assert_eq!(s.grid, grid);
        assert!(events.is_empty());
    }

    #[test]
    fn fire_scores_chain_but_not_origin() {
        let mut s = parked();
        s.player.pos = p(5, 1);
        // Rows 6-9 hold one seven-tree cluster.
        let events = step(&mut s, Intent::Fire(Direction::Down)).unwrap();
        assert_eq!(s.score, 6);
        assert_eq!(s.energy, 22);
        assert_eq!(s.grid.count(CellState::Tree), 1); // (1,2) survives
        let scored = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BurnedOut { scored: true, .. }))
            .count();
        assert_eq!(scored, 6);
    }

    #[test]
    fn agents_move_after_fire_clears_path() {
        let mut s = parked();
        s.player.pos = p(5, 1);
        let events = step(&mut s, Intent::Fire(Direction::Down)).unwrap();
        // Cluster is gone, so the agent steps Up on the same tick.
        assert_eq!(s.agents[0].pos, p(8, 1));
        assert!(events.contains(&GameEvent::AgentMoved { id: 0, from: p(9, 1), to: p(8, 1) }));
    }

    // ── Infection ──

    #[test]
    fn agent_reaching_player_infects() {
        let mut s = session_with(&BOARD, &[(3, 1)]);
        // Player steps down to (2,1); agent at (3,1) sees the player above and steps Up.
        let events = step(&mut s, Intent::Move(Direction::Down)).unwrap();
        assert_eq!(s.phase, Phase::LostInfected);
        assert_eq!(events.last(), Some(&GameEvent::PlayerInfected { id: 0 }));
    }

    #[test]
    fn player_walking_into_agent_infects() {
        let mut s = session_with(&BOARD, &[(2, 1)]);
        s.player.pos = p(3, 1);
        step(&mut s, Intent::Move(Direction::Up)).unwrap();
        assert_eq!(s.player.pos, p(2, 1));
        assert_eq!(s.phase, Phase::LostInfected);
    }

    #[test]
    fn boxed_in_agent_is_harmless() {
        let mut s = parked();
        step(&mut s, Intent::Move(Direction::Down)).unwrap();
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.infecting_agent(), None);
    }

    // ── Exit ──

    #[test]
    fn reaching_exit_wins() {
        let mut s = parked();
        s.player.pos = p(4, 8);
        let events = step(&mut s, Intent::Move(Direction::Right)).unwrap();
        assert_eq!(s.phase, Phase::Won);
        assert_eq!(events.last(), Some(&GameEvent::Escaped));
    }

    #[test]
    fn finished_session_ignores_input() {
        let mut s = parked();
        s.phase = Phase::Won;
        let events = step(&mut s, Intent::Move(Direction::Down)).unwrap();
        assert!(events.is_empty());
        assert_eq!(s.player.pos, p(1, 1));
    }
}
