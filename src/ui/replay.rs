/// Animation replay.
///
/// `step` mutates the session in one go; the screen wants to see it happen.
/// A `Replay` starts from a clone of the session taken *before* the step and
/// re-applies the step's events one at a time. Each call to `advance` moves
/// to the next frame worth drawing and says how long to hold it.
///
/// Player and agent moves are applied silently. Frames are produced for:
///   - chop: 4 frames, target alternates tree / ground, banner grows
///   - fire: one frame per ignition and per burn-out
///   - exit: player on the exit, then one step past it

use std::collections::VecDeque;

use tracing::debug;

use crate::domain::cell::CellState;
use crate::domain::entity::Position;
use crate::sim::event::GameEvent;
use crate::sim::world::Session;

const CHOP_FRAMES: u8 = 4;

/// Which timing a frame uses.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pace {
    Chop,
    Fire,
    Victory,
}

/// One frame: draw `Replay::scene()`, show `banner`, wait for `pace`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Beat {
    pub banner: String,
    pub pace: Pace,
}

impl Beat {
    fn plain(pace: Pace) -> Self {
        Beat { banner: String::new(), pace }
    }
}

pub struct Replay {
    scene: Session,
    events: VecDeque<GameEvent>,
    chop: Option<(Position, u8)>,
    past_exit: bool,
}

impl Replay {
    pub fn new(before: Session, events: &[GameEvent]) -> Self {
        Replay {
            scene: before,
            events: events.iter().cloned().collect(),
            chop: None,
            past_exit: false,
        }
    }

    /// State to draw for the frame last returned by `advance`.
    pub fn scene(&self) -> &Session {
        &self.scene
    }

    /// Apply events up to the next frame. `None` once everything is replayed.
    pub fn advance(&mut self) -> Option<Beat> {
        if let Some((pos, n)) = self.chop {
            return Some(self.chop_frame(pos, n));
        }
        if self.past_exit {
            self.past_exit = false;
            if let Some(next) = self.scene.player.pos.offset(0, 1) {
                self.scene.player.pos = next;
            }
            return Some(Beat::plain(Pace::Victory));
        }

        while let Some(event) = self.events.pop_front() {
            match event {
                GameEvent::PlayerMoved { to, .. } => {
                    self.scene.player.pos = to;
                    self.scene.energy -= 1;
                }
                GameEvent::AgentMoved { id, to, .. } => {
                    if let Some(agent) = self.scene.agents.iter_mut().find(|a| a.id == id) {
                        agent.pos = to;
                    }
                }
                GameEvent::TreeChopped { pos } => {
                    return Some(self.chop_frame(pos, 0));
                }
                GameEvent::Ignited { pos } => {
                    self.paint(pos, CellState::Burning);
                    return Some(Beat::plain(Pace::Fire));
                }
                GameEvent::BurnedOut { pos, scored } => {
                    self.paint(pos, CellState::Ground);
                    if scored {
                        self.scene.score += 1;
                    }
                    return Some(Beat::plain(Pace::Fire));
                }
                GameEvent::Escaped => {
                    self.past_exit = true;
                    return Some(Beat::plain(Pace::Victory));
                }
                GameEvent::MoveBlocked { .. }
                | GameEvent::EnergyDepleted
                | GameEvent::PlayerInfected { .. } => {}
            }
        }
        None
    }

    fn chop_frame(&mut self, pos: Position, n: u8) -> Beat {
        let state = if n % 2 == 0 { CellState::Tree } else { CellState::Ground };
        self.paint(pos, state);

        if n + 1 == CHOP_FRAMES {
            self.scene.score += 1;
            self.chop = None;
        } else {
            self.chop = Some((pos, n + 1));
        }

        Beat {
            banner: "Chop! ".repeat(n as usize + 1),
            pace: Pace::Chop,
        }
    }

    fn paint(&mut self, pos: Position, state: CellState) {
        if let Err(e) = self.scene.grid.set_cell(pos, state) {
            debug!(error = %e, "replay event outside the board");
        }
    }
}
