use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{centered, digit_cell, entropy_rng, help_line, Cursor, Game};
use crate::timer::Interval;

pub const BURROWS: usize = 9;
const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

pub struct Settings {
    pub refresh: Duration,
    pub round_secs: u32,
    pub moles: usize,
    pub label: &'static str,
    pub blurb: &'static str,
}

impl Difficulty {
    pub fn settings(self) -> Settings {
        match self {
            Difficulty::Easy => Settings {
                refresh: Duration::from_millis(1200),
                round_secs: 45,
                moles: 1,
                label: "Easy",
                blurb: "Slower moles, 45 seconds",
            },
            Difficulty::Medium => Settings {
                refresh: Duration::from_millis(800),
                round_secs: 30,
                moles: 1,
                label: "Medium",
                blurb: "Normal speed, 30 seconds",
            },
            Difficulty::Hard => Settings {
                refresh: Duration::from_millis(500),
                round_secs: 20,
                moles: 2,
                label: "Hard",
                blurb: "Fast moles, 2 at once, 20 seconds",
            },
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Difficulty::Easy => "🌱",
            Difficulty::Medium => "🔥",
            Difficulty::Hard => "💀",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhackState {
    pub burrows: [bool; BURROWS],
    pub score: u32,
    pub time_left: u32,
    pub running: bool,
    pub difficulty: Option<Difficulty>,
}

pub struct WhackAMole {
    state: WhackState,
    rng: ChaCha8Rng,
    refresh: Interval,
    countdown: Interval,
    cursor: Cursor,
}

impl WhackAMole {
    pub fn new() -> Self {
        Self::with_rng(entropy_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            state: WhackState {
                burrows: [false; BURROWS],
                score: 0,
                time_left: 0,
                running: false,
                difficulty: None,
            },
            rng,
            refresh: Interval::new(Difficulty::Medium.settings().refresh),
            countdown: Interval::new(COUNTDOWN_PERIOD),
            cursor: Cursor::new(3, 3),
        }
    }

    pub fn state(&self) -> &WhackState {
        &self.state
    }

    /// Fixes the round parameters. Any round in progress is stopped.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.stop();
        self.state.difficulty = Some(difficulty);
        self.state.time_left = difficulty.settings().round_secs;
        self.refresh = Interval::new(difficulty.settings().refresh);
    }

    /// Starts a round at the selected difficulty. No-op before one is chosen.
    pub fn start(&mut self, now: Instant) {
        let Some(difficulty) = self.state.difficulty else { return };
        self.state.burrows = [false; BURROWS];
        self.state.score = 0;
        self.state.time_left = difficulty.settings().round_secs;
        self.state.running = true;
        self.refresh.start(now);
        self.countdown.start(now);
        log::debug!("whack: {} round started", difficulty.settings().label);
    }

    /// Back to difficulty selection.
    pub fn clear_difficulty(&mut self) {
        self.stop();
        self.state.difficulty = None;
        self.state.score = 0;
        self.state.burrows = [false; BURROWS];
    }

    /// Scores only when the round is live and the burrow holds a mole.
    pub fn whack(&mut self, index: usize) {
        if !self.state.running || index >= BURROWS || !self.state.burrows[index] {
            return;
        }
        self.state.burrows[index] = false;
        self.state.score += 1;
    }

    fn stop(&mut self) {
        self.state.running = false;
        self.refresh.stop();
        self.countdown.stop();
    }

    fn pop_moles(&mut self) {
        let Some(difficulty) = self.state.difficulty else { return };
        self.state.burrows = [false; BURROWS];
        for i in index::sample(&mut self.rng, BURROWS, difficulty.settings().moles).into_iter() {
            self.state.burrows[i] = true;
        }
    }

    fn count_down(&mut self) {
        self.state.time_left = self.state.time_left.saturating_sub(1);
        if self.state.time_left == 0 {
            self.stop();
            log::debug!("whack: time up with score {}", self.state.score);
        }
    }

    fn render_difficulty_select(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Select Difficulty",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        let colors = [Color::Rgb(22, 163, 74), Color::Rgb(202, 138, 4), Color::Rgb(220, 38, 38)];
        for (i, d) in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard].into_iter().enumerate() {
            let s = d.settings();
            lines.push(Line::from(vec![
                Span::styled(format!("[{}] ", i + 1), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
                Span::styled(format!("{} {:<8}", d.icon(), s.label), Style::default().fg(colors[i]).add_modifier(Modifier::BOLD)),
                Span::styled(s.blurb, Style::default().fg(Color::Rgb(148, 163, 184))),
            ]));
        }
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), centered(area, 56, 7));
    }

    fn render_field(&self, frame: &mut Frame, area: Rect) {
        let field = centered(area, 36, 15);
        frame.render_widget(Block::default().style(Style::default().bg(Color::Rgb(120, 53, 15))), field);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(field);
        for (r, row_area) in rows.iter().enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 3); 3])
                .split(*row_area);
            for (c, hole_area) in cols.iter().enumerate() {
                let i = r * 3 + c;
                let mole = self.state.burrows[i];
                let selected = self.cursor.index == i;
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_type(if selected { BorderType::Double } else { BorderType::Rounded })
                    .border_style(Style::default().fg(if selected { Color::Rgb(255, 220, 80) } else { Color::Rgb(69, 26, 3) }))
                    .title(format!(" {} ", i + 1))
                    .style(Style::default().bg(if mole { Color::Rgb(217, 119, 6) } else { Color::Rgb(146, 64, 14) }));
                let inner = block.inner(*hole_area);
                frame.render_widget(block, *hole_area);
                let mut lines = vec![Line::from(""); (inner.height.saturating_sub(1) / 2) as usize];
                lines.push(Line::from(if mole { "🐹" } else { "🕳" }));
                frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
            }
        }
    }
}

impl Game for WhackAMole {
    /// Replays overdue refreshes and countdown seconds in the order they
    /// came due, so nothing fires past the end of the round.
    fn update(&mut self, now: Instant) {
        while self.state.running {
            match (self.refresh.due(now), self.countdown.due(now)) {
                (Some(refresh_at), Some(count_at)) if refresh_at < count_at => {
                    self.refresh.fire(now);
                    self.pop_moles();
                }
                (_, Some(_)) => {
                    self.countdown.fire(now);
                    self.count_down();
                }
                (Some(_), None) => {
                    self.refresh.fire(now);
                    self.pop_moles();
                }
                (None, None) => break,
            }
        }
    }

    fn handle_input(&mut self, key: KeyEvent, now: Instant) {
        if self.state.difficulty.is_none() {
            let picked = match key.code {
                KeyCode::Char('1') => Some(Difficulty::Easy),
                KeyCode::Char('2') => Some(Difficulty::Medium),
                KeyCode::Char('3') => Some(Difficulty::Hard),
                _ => None,
            };
            if let Some(d) = picked {
                self.select_difficulty(d);
                self.start(now);
            }
            return;
        }
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(now),
            KeyCode::Char('m') | KeyCode::Char('M') => self.clear_difficulty(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.state.running {
                    self.whack(self.cursor.index);
                } else {
                    self.start(now);
                }
            }
            code => {
                if let Some(i) = digit_cell(code) {
                    self.cursor.index = i;
                    self.whack(i);
                } else {
                    self.cursor.step(code);
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(239, 68, 68)))
            .title(" 🔨 Whack-a-Mole ")
            .title_style(Style::default().fg(Color::Rgb(252, 165, 165)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(9), Constraint::Length(1)])
            .split(inner);

        let Some(difficulty) = self.state.difficulty else {
            self.render_difficulty_select(frame, chunks[1]);
            frame.render_widget(
                Paragraph::new(help_line(&[("1", "Easy"), ("2", "Medium"), ("3", "Hard"), ("Esc", "Menu")])),
                chunks[2],
            );
            return;
        };

        let status = Line::from(vec![
            Span::styled(
                format!(" Score: {} ", self.state.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Time: {}s", self.state.time_left),
                Style::default().fg(if self.state.time_left <= 5 { Color::Red } else { Color::White }).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("({})", difficulty.settings().label),
                Style::default().fg(Color::Rgb(148, 163, 184)),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);
        self.render_field(frame, chunks[1]);

        let footer = if self.state.running {
            help_line(&[("1-9/SPACE", "Whack"), ("↑↓←→", "Aim"), ("R", "Restart"), ("M", "Difficulty"), ("Esc", "Menu")])
        } else {
            Line::from(vec![
                Span::styled(
                    format!(" ⏰ Time's up! Final score: {} ", self.state.score),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::styled("ENTER play again, M difficulty, Esc menu", Style::default().fg(Color::Gray)),
            ])
        };
        frame.render_widget(Paragraph::new(footer), chunks[2]);
    }

    /// Replays at the same difficulty.
    fn reset(&mut self, now: Instant) {
        self.start(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(d: Difficulty, seed: u64) -> (WhackAMole, Instant) {
        let t0 = Instant::now();
        let mut w = WhackAMole::with_seed(seed);
        w.select_difficulty(d);
        w.start(t0);
        (w, t0)
    }

    fn moles(w: &WhackAMole) -> Vec<usize> {
        (0..BURROWS).filter(|&i| w.state().burrows[i]).collect()
    }

    #[test]
    fn start_without_difficulty_is_ignored() {
        let mut w = WhackAMole::with_seed(1);
        let before = w.state().clone();
        w.start(Instant::now());
        assert_eq!(w.state(), &before);
    }

    #[test]
    fn refresh_places_the_configured_number_of_moles() {
        let (mut w, t0) = running(Difficulty::Hard, 2);
        assert!(moles(&w).is_empty());
        for k in 1..=10u32 {
            w.update(t0 + Duration::from_millis(500) * k);
            assert_eq!(moles(&w).len(), 2);
        }

        let (mut w, t0) = running(Difficulty::Easy, 3);
        w.update(t0 + Duration::from_millis(1199));
        assert!(moles(&w).is_empty());
        w.update(t0 + Duration::from_millis(1200));
        assert_eq!(moles(&w).len(), 1);
    }

    #[test]
    fn whack_scores_once_per_mole() {
        let (mut w, t0) = running(Difficulty::Medium, 4);
        w.update(t0 + Duration::from_millis(800));
        let hit = moles(&w)[0];
        w.whack(hit);
        assert_eq!(w.state().score, 1);
        assert!(!w.state().burrows[hit]);

        let before = w.state().clone();
        w.whack(hit);
        w.whack(hit);
        assert_eq!(w.state(), &before);
    }

    #[test]
    fn whacking_an_empty_burrow_is_a_noop() {
        let (mut w, t0) = running(Difficulty::Medium, 5);
        w.update(t0 + Duration::from_millis(800));
        let empty = (0..BURROWS).find(|&i| !w.state().burrows[i]).unwrap();
        let before = w.state().clone();
        w.whack(empty);
        w.whack(BURROWS + 3);
        assert_eq!(w.state(), &before);
    }

    #[test]
    fn round_ends_when_time_runs_out() {
        let (mut w, t0) = running(Difficulty::Hard, 6);
        assert_eq!(w.state().time_left, 20);
        w.update(t0 + Duration::from_secs(19));
        assert_eq!(w.state().time_left, 1);
        assert!(w.state().running);
        w.update(t0 + Duration::from_secs(20));
        assert_eq!(w.state().time_left, 0);
        assert!(!w.state().running);

        // Both processes are stopped: nothing changes afterwards.
        let ended = w.state().clone();
        w.update(t0 + Duration::from_secs(60));
        assert_eq!(w.state(), &ended);
        if let Some(&i) = moles(&w).first() {
            w.whack(i);
        }
        assert_eq!(w.state(), &ended);
    }

    #[test]
    fn late_poll_matches_polling_every_period() {
        let (mut stepped, t0) = running(Difficulty::Hard, 10);
        for k in 1..=40u32 {
            stepped.update(t0 + Duration::from_millis(500) * k);
        }
        assert!(!stepped.state().running);

        // One poll long after time-up replays exactly the same refreshes.
        let (mut late, t0) = running(Difficulty::Hard, 10);
        late.update(t0 + Duration::from_secs(60));
        assert_eq!(late.state(), stepped.state());
        assert_eq!(late.state().time_left, 0);
    }

    #[test]
    fn changing_difficulty_stops_the_round() {
        let (mut w, t0) = running(Difficulty::Easy, 7);
        w.select_difficulty(Difficulty::Hard);
        assert!(!w.state().running);
        let before = w.state().clone();
        w.update(t0 + Duration::from_secs(10));
        assert_eq!(w.state(), &before);
    }

    #[test]
    fn leaving_to_difficulty_select_clears_the_round() {
        let (mut w, t0) = running(Difficulty::Medium, 8);
        w.update(t0 + Duration::from_millis(1600));
        w.clear_difficulty();
        assert_eq!(w.state().difficulty, None);
        assert!(moles(&w).is_empty());
        w.update(t0 + Duration::from_secs(5));
        assert!(moles(&w).is_empty());
    }

    #[test]
    fn digit_keys_pick_difficulty_then_whack() {
        let t0 = Instant::now();
        let mut w = WhackAMole::with_seed(9);
        w.handle_input(KeyEvent::from(KeyCode::Char('3')), t0);
        assert_eq!(w.state().difficulty, Some(Difficulty::Hard));
        assert!(w.state().running);

        w.update(t0 + Duration::from_millis(500));
        let hit = moles(&w)[0];
        let key = char::from_digit(hit as u32 + 1, 10).unwrap();
        w.handle_input(KeyEvent::from(KeyCode::Char(key)), t0);
        assert_eq!(w.state().score, 1);
    }
}
