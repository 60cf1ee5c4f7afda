/// Keyboard input.
///
/// Two layers:
///   - Pure key mapping (`parse_action`, `parse_direction`), testable, and
///     returns `GameError::InvalidIntent` for anything unrecognized.
///   - Blocking readers that pull the next key press from crossterm while
///     the terminal is in raw mode, plus the line-based dimension prompt
///     used before the game screen opens.
///
/// Key map:  h=left  j=up  k=down  l=right  c=chop  f=fire
/// Arrow keys are accepted for movement and directions.

use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Direction;
use crate::domain::error::{GameError, Result};
use crate::sim::world::{validate_dimension, MAX_DIMENSION, MIN_DIMENSION};

/// First key of a decision.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Move(Direction),
    Chop,
    Fire,
}

/// What the player pressed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Code(KeyCode),
    Abort, // Ctrl+C
}

fn direction_of(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('h') | KeyCode::Left => Some(Direction::Left),
        KeyCode::Char('j') | KeyCode::Up => Some(Direction::Up),
        KeyCode::Char('k') | KeyCode::Down => Some(Direction::Down),
        KeyCode::Char('l') | KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

fn invalid(code: KeyCode) -> GameError {
    match code {
        KeyCode::Char(c) => GameError::InvalidIntent(c),
        KeyCode::Enter => GameError::InvalidIntent('\n'),
        KeyCode::Tab => GameError::InvalidIntent('\t'),
        _ => GameError::InvalidIntent('?'),
    }
}

/// Map the first key of a decision.
pub fn parse_action(code: KeyCode) -> Result<Action> {
    if let Some(dir) = direction_of(code) {
        return Ok(Action::Move(dir));
    }
    match code {
        KeyCode::Char('c') => Ok(Action::Chop),
        KeyCode::Char('f') => Ok(Action::Fire),
        other => Err(invalid(other)),
    }
}

/// Map the direction key that follows chop / fire.
pub fn parse_direction(code: KeyCode) -> Result<Direction> {
    direction_of(code).ok_or_else(|| invalid(code))
}

fn classify(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && (key.code == KeyCode::Char('c') || key.code == KeyCode::Char('C'))
    {
        return Some(Key::Abort);
    }
    Some(Key::Code(key.code))
}

/// Block until the next key press.
pub fn read_key() -> io::Result<Key> {
    loop {
        if let Event::Key(key) = event::read()? {
            if let Some(k) = classify(key) {
                return Ok(k);
            }
        }
    }
}

/// Ask for the board dimension on a plain line-buffered terminal.
/// Re-asks until the answer is an integer in range. Fails only on EOF / I/O error.
pub fn prompt_dimension<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<usize> {
    write!(out, "Please enter a dimension for the board ({MIN_DIMENSION}-{MAX_DIMENSION}): ")?;
    out.flush()?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no dimension given"));
        }
        if let Ok(n) = line.trim().parse::<i64>() {
            if let Ok(d) = validate_dimension(n) {
                return Ok(d);
            }
        }
        writeln!(out, "Sorry, you've entered a number outside of the range.")?;
        write!(out, "Please enter a dimension for the board ({MIN_DIMENSION}-{MAX_DIMENSION}): ")?;
        out.flush()?;
    }
}
