use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{centered, entropy_rng, help_line, Cursor, Game};
use crate::timer::Timeout;

const SYMBOLS: [&str; 8] = ["🎮", "🎲", "🎯", "🎪", "🎨", "🎭", "🎵", "🎸"];
pub const DECK_SIZE: usize = SYMBOLS.len() * 2;
const COLS: usize = 4;
pub const MISMATCH_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryState {
    /// Symbol index per card, fixed until the next reset.
    pub deck: Vec<u8>,
    pub face_up: Vec<usize>,
    pub matched: Vec<usize>,
    pub moves: u32,
}

impl MemoryState {
    pub fn is_shown(&self, index: usize) -> bool {
        self.face_up.contains(&index) || self.matched.contains(&index)
    }

    pub fn is_won(&self) -> bool {
        self.matched.len() == self.deck.len()
    }
}

pub struct Memory {
    state: MemoryState,
    rng: ChaCha8Rng,
    hide: Timeout,
    cursor: Cursor,
}

impl Memory {
    pub fn new() -> Self {
        Self::with_rng(entropy_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: ChaCha8Rng) -> Self {
        let deck = Self::shuffled_deck(&mut rng);
        Self {
            state: MemoryState {
                deck,
                face_up: Vec::with_capacity(2),
                matched: Vec::with_capacity(DECK_SIZE),
                moves: 0,
            },
            rng,
            hide: Timeout::idle(),
            cursor: Cursor::new(COLS, DECK_SIZE / COLS),
        }
    }

    fn shuffled_deck(rng: &mut ChaCha8Rng) -> Vec<u8> {
        let mut deck: Vec<u8> = (0..SYMBOLS.len() as u8).chain(0..SYMBOLS.len() as u8).collect();
        deck.shuffle(rng);
        deck
    }

    pub fn state(&self) -> &MemoryState {
        &self.state
    }

    /// Turns a card face up. Ignored while a pair is showing or when the
    /// card is already visible.
    pub fn reveal(&mut self, index: usize, now: Instant) {
        if index >= self.state.deck.len()
            || self.state.face_up.len() == 2
            || self.state.is_shown(index)
        {
            return;
        }
        self.state.face_up.push(index);
        if self.state.face_up.len() < 2 {
            return;
        }

        self.state.moves += 1;
        let (a, b) = (self.state.face_up[0], self.state.face_up[1]);
        if self.state.deck[a] == self.state.deck[b] {
            self.state.matched.extend([a, b]);
            self.state.face_up.clear();
            if self.state.is_won() {
                log::debug!("memory: won in {} moves", self.state.moves);
            }
        } else {
            self.hide.schedule(now, MISMATCH_DELAY);
        }
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, index: usize) {
        let selected = self.cursor.index == index;
        let matched = self.state.matched.contains(&index);
        let shown = self.state.is_shown(index);
        let (bg, fg) = if matched {
            (Color::Rgb(88, 28, 135), Color::Rgb(216, 180, 254))
        } else if shown {
            (Color::Rgb(168, 85, 247), Color::White)
        } else {
            (Color::Rgb(51, 65, 85), Color::Rgb(148, 163, 184))
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if selected { BorderType::Double } else { BorderType::Rounded })
            .border_style(Style::default().fg(if selected { Color::Rgb(255, 220, 80) } else { bg }))
            .style(Style::default().bg(bg));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let face = if shown {
            SYMBOLS[self.state.deck[index] as usize]
        } else {
            "?"
        };
        let mut lines = vec![Line::from(""); (inner.height.saturating_sub(1) / 2) as usize];
        lines.push(Line::from(Span::styled(face, Style::default().fg(fg).add_modifier(Modifier::BOLD))));
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}

impl Game for Memory {
    fn update(&mut self, now: Instant) {
        if self.hide.fire(now) {
            self.state.face_up.clear();
        }
    }

    fn handle_input(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(now),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.state.is_won() {
                    self.reset(now);
                } else {
                    self.reveal(self.cursor.index, now);
                }
            }
            code => {
                self.cursor.step(code);
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(139, 92, 246)))
            .title(" 🧠 Memory Match ")
            .title_style(Style::default().fg(Color::Rgb(196, 181, 253)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(12), Constraint::Length(1)])
            .split(inner);

        let status = Line::from(vec![
            Span::styled(
                format!(" Moves: {} ", self.state.moves),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Pairs: {}/{}", self.state.matched.len() / 2, SYMBOLS.len()),
                Style::default().fg(Color::Green),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let board = centered(chunks[1], 40, 20);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(board);
        for (r, row_area) in rows.iter().enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 4); 4])
                .split(*row_area);
            for (c, card_area) in cols.iter().enumerate() {
                self.render_card(frame, *card_area, r * COLS + c);
            }
        }

        let footer = if self.state.is_won() {
            Line::from(vec![
                Span::styled(
                    format!(" 🎉 You won in {} moves! ", self.state.moves),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::styled("Press ENTER to play again, Esc for menu", Style::default().fg(Color::Gray)),
            ])
        } else {
            help_line(&[("↑↓←→/WASD", "Select"), ("SPACE", "Flip"), ("R", "Shuffle"), ("Esc", "Menu")])
        };
        frame.render_widget(Paragraph::new(footer), chunks[2]);
    }

    fn reset(&mut self, _now: Instant) {
        self.state.deck = Self::shuffled_deck(&mut self.rng);
        self.state.face_up.clear();
        self.state.matched.clear();
        self.state.moves = 0;
        self.hide.cancel();
        self.cursor = Cursor::new(COLS, DECK_SIZE / COLS);
    }
}
