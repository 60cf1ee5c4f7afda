/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// Each frame is composed into `front`, compared against `back` (what is on
/// screen now), and only the changed runs are written. The buffers are sized
/// once from the board, so the frame never changes shape during a session.
///
/// Screen layout while playing:
///
///   row 0            HUD
///   row 2 ..         board (each game cell = 2 terminal columns)
///   board + 1        banner (animation text, e.g. "Chop! Chop! ")
///   board + 2        message (rejected input, end-of-game text)
///   board + 3        prompt

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::cell::CellState;
use crate::domain::entity::Position;
use crate::sim::world::{Phase, Snapshot};

// ── Cell ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White };

    /// Never composed, so a back buffer full of these repaints everything.
    const UNDRAWN: Cell = Cell { ch: '\0', fg: Color::Reset };

    fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg }
    }
}

// ── FrameBuffer ──

#[derive(Clone)]
struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

/// Consecutive changed cells on one row.
#[derive(Debug, PartialEq, Eq)]
struct Run {
    x: usize,
    y: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize, fill: Cell) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![fill; w * h],
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y), clipped to the buffer width.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg));
        }
    }

    /// Cells that differ from `prev`, grouped into row runs.
    fn dirty_runs(&self, prev: &FrameBuffer) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for y in 0..self.height {
            let mut open = false;
            for x in 0..self.width {
                let cell = self.get(x, y);
                if cell == prev.get(x, y) {
                    open = false;
                    continue;
                }
                match runs.last_mut() {
                    Some(run) if open => run.cells.push(cell),
                    _ => runs.push(Run { x, y, cells: vec![cell] }),
                }
                open = true;
            }
        }
        runs
    }
}

// ── Glyphs ──

pub fn cell_glyph(state: CellState) -> (char, Color) {
    match state {
        CellState::Border => ('#', Color::Cyan),
        CellState::Tree => ('^', Color::Green),
        CellState::Ground => ('.', Color::Yellow),
        CellState::Burning => ('^', Color::Red),
        CellState::Exit => (' ', Color::White),
    }
}

const PLAYER_GLYPH: (char, Color) = ('@', Color::Red);
const AGENT_GLYPH: (char, Color) = ('X', Color::White);

/// Glyph at a board position. Agents draw over the player so a catch is visible.
fn glyph_at(snap: &Snapshot, pos: Position) -> (char, Color) {
    if snap.agents.iter().any(|a| a.pos == pos) {
        return AGENT_GLYPH;
    }
    if snap.player == pos {
        return PLAYER_GLYPH;
    }
    match snap.grid.get(pos) {
        Some(state) => cell_glyph(state),
        None => (' ', Color::White),
    }
}

pub fn hud_text(snap: &Snapshot) -> String {
    format!(
        "Energy: {}/{}   High Score: {}   Score: {}",
        snap.energy, snap.max_energy, snap.high_score, snap.score
    )
}

/// Message line color: outcome text is tinted by how the session ended.
fn message_color(phase: Phase) -> Color {
    match phase {
        Phase::Playing => Color::White,
        Phase::Won => Color::Green,
        Phase::LostEnergy | Phase::LostInfected => Color::Red,
    }
}

/// Text lines drawn under the board.
#[derive(Clone, Copy, Default, Debug)]
pub struct Status<'a> {
    pub banner: &'a str,
    pub message: &'a str,
    pub prompt: &'a str,
}

// ── Renderer ──

/// Each game cell = 2 terminal columns (glyph + spacer).
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
/// Banner, message and prompt, plus one blank row after the board.
const STATUS_ROWS: usize = 4;
/// Wide enough for the longest end-of-game message.
const TEXT_W: usize = 120;

/// Frame size for a board of `side` cells: (columns, rows).
fn frame_size(side: usize) -> (usize, usize) {
    ((side * CELL_W).max(TEXT_W), MAP_ROW + side + STATUS_ROWS)
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
}

impl Renderer {
    pub fn new(side: usize) -> Self {
        let (w, h) = frame_size(side);
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(w, h, Cell::BLANK),
            back: FrameBuffer::new(w, h, Cell::UNDRAWN),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Draw the board, HUD and status lines.
    pub fn render(&mut self, snap: &Snapshot, status: &Status) -> io::Result<()> {
        self.front.clear();
        self.compose_game(snap, status);
        self.present()
    }

    /// Draw a text-only screen (intro).
    pub fn render_text(&mut self, lines: &[&str]) -> io::Result<()> {
        self.front.clear();
        for (i, line) in lines.iter().enumerate() {
            self.front.put_str(2, 1 + i, line, Color::White);
        }
        self.present()
    }

    fn present(&mut self) -> io::Result<()> {
        let mut fg = None;
        for run in self.front.dirty_runs(&self.back) {
            queue!(self.writer, MoveTo(run.x as u16, run.y as u16))?;
            for cell in run.cells {
                if fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    fg = Some(cell.fg);
                }
                queue!(self.writer, Print(cell.ch))?;
            }
        }
        self.writer.flush()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn compose_game(&mut self, snap: &Snapshot, status: &Status) {
        self.front.put_str(0, HUD_ROW, &hud_text(snap), Color::White);

        let side = snap.grid.side();
        for row in 0..side {
            for col in 0..side {
                let (ch, fg) = glyph_at(snap, Position::new(row, col));
                self.front.set(col * CELL_W, MAP_ROW + row, Cell::new(ch, fg));
            }
        }

        let below = MAP_ROW + side;
        self.front.put_str(0, below + 1, status.banner, Color::Yellow);
        self.front.put_str(0, below + 2, status.message, message_color(snap.phase));
        self.front.put_str(0, below + 3, status.prompt, Color::DarkGrey);
    }
}
