pub mod memory;
pub mod reaction;
pub mod snake;
pub mod tictactoe;
pub mod whack;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::prelude::*;

/// Presentation binding for one game session.
///
/// Every method that can schedule or observe time takes `now` explicitly;
/// engines never read the clock on their own.
pub trait Game {
    /// Polls the session's timers.
    fn update(&mut self, now: Instant);
    fn handle_input(&mut self, key: KeyEvent, now: Instant);
    fn render(&mut self, frame: &mut Frame, area: Rect);
    fn reset(&mut self, now: Instant);
}

/// A fresh, unpredictable RNG for interactive play.
pub(crate) fn entropy_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(rand::random())
}

/// Selection cursor over a row-major board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub index: usize,
    cols: usize,
    rows: usize,
}

impl Cursor {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { index: 0, cols, rows }
    }

    pub fn row(&self) -> usize {
        self.index / self.cols
    }

    pub fn col(&self) -> usize {
        self.index % self.cols
    }

    /// Moves on arrow/WASD keys, wrapping at the edges. Returns false for
    /// keys that are not movement keys.
    pub fn step(&mut self, key: KeyCode) -> bool {
        let (mut r, mut c) = (self.row(), self.col());
        match key {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => r = (r + self.rows - 1) % self.rows,
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => r = (r + 1) % self.rows,
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => c = (c + self.cols - 1) % self.cols,
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => c = (c + 1) % self.cols,
            _ => return false,
        }
        self.index = r * self.cols + c;
        true
    }
}

/// Maps the digit keys 1-9 onto a 3x3 board, row-major from the top left.
pub fn digit_cell(key: KeyCode) -> Option<usize> {
    match key {
        KeyCode::Char(c @ '1'..='9') => Some(c as usize - '1' as usize),
        _ => None,
    }
}

/// One key hint in a help bar: highlighted key followed by a dim label.
fn hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(format!(" {} ", key), Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", label), Style::default().fg(Color::DarkGray)),
    ]
}

/// Builds a help bar line from key hints separated by dividers.
pub(crate) fn help_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, &(key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("│", Style::default().fg(Color::Rgb(60, 60, 60))));
        }
        spans.extend(hint(key, label));
    }
    Line::from(spans)
}

/// Centers a `width` x `height` rectangle inside `area`, clamped to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
