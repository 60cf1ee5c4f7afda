/// Events emitted during a simulation step.
/// The presentation layer consumes these for animation.

use crate::domain::entity::Position;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PlayerMoved { from: Position, to: Position },
    /// The player tried to step onto a tree or the border and stayed put.
    MoveBlocked { row: usize, col: usize },
    TreeChopped { pos: Position },
    Ignited { pos: Position },
    BurnedOut { pos: Position, scored: bool },
    AgentMoved { id: usize, from: Position, to: Position },
    EnergyDepleted,
    PlayerInfected { id: usize },
    Escaped,
}
