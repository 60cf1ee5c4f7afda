/// Entities: Player, Agent, plus the small value types they move with.
/// Coordinates are (row, col) with (0, 0) the top-left border corner.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Apply a signed offset. Returns None if either coordinate would go negative.
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Position> {
        let row = self.row as i64 + d_row as i64;
        let col = self.col as i64 + d_col as i64;
        if row < 0 || col < 0 {
            return None;
        }
        Some(Position::new(row as usize, col as usize))
    }

    /// One cell in the given direction.
    pub fn step(self, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        self.offset(dr, dc)
    }
}

/// Unit direction (no diagonals).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Up,
    Down,
    Right,
}

impl Direction {
    /// (d_row, d_col)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (0, -1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Right => (0, 1),
        }
    }
}

/// A validated player decision for one tick.
/// The input layer only ever hands the simulation one of these.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    Move(Direction),
    Chop(Direction),
    Fire(Direction),
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Position,
}

impl Player {
    /// Every session starts in the top-left interior corner.
    pub const START: Position = Position::new(1, 1);

    pub fn new() -> Self {
        Player { pos: Self::START }
    }
}

/// An infected hiker. Moves one greedy step toward the player per tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Agent {
    pub id: usize,
    pub pos: Position,
}

impl Agent {
    pub fn new(id: usize, pos: Position) -> Self {
        Agent { id, pos }
    }
}
