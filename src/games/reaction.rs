use std::ops::Range;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{centered, entropy_rng, help_line, Game};
use crate::timer::Timeout;

/// Arming delay bounds in milliseconds.
const ARM_DELAY_MS: Range<u64> = 2000..5000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    /// Red screen, the go signal is scheduled.
    Armed,
    /// Green screen, the clock is running.
    Ready,
    TooEarly,
    Result,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactionState {
    pub phase: Phase,
    pub go_at: Option<Instant>,
    pub last: Option<Duration>,
    pub best: Option<Duration>,
}

pub struct Reaction {
    state: ReactionState,
    rng: ChaCha8Rng,
    go_signal: Timeout,
}

impl Reaction {
    pub fn new() -> Self {
        Self::with_rng(entropy_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            state: ReactionState {
                phase: Phase::Waiting,
                go_at: None,
                last: None,
                best: None,
            },
            rng,
            go_signal: Timeout::idle(),
        }
    }

    pub fn state(&self) -> &ReactionState {
        &self.state
    }

    /// The single input: what it means depends on the phase.
    pub fn click(&mut self, now: Instant) {
        match self.state.phase {
            Phase::Waiting => {
                let delay = Duration::from_millis(self.rng.gen_range(ARM_DELAY_MS));
                self.go_signal.schedule(now, delay);
                self.state.phase = Phase::Armed;
            }
            Phase::Armed => {
                self.go_signal.cancel();
                self.state.phase = Phase::TooEarly;
            }
            Phase::Ready => {
                let go_at = self.state.go_at.unwrap_or(now);
                let latency = now.saturating_duration_since(go_at);
                self.state.last = Some(latency);
                if self.state.best.map_or(true, |best| latency < best) {
                    self.state.best = Some(latency);
                }
                self.state.phase = Phase::Result;
                log::debug!("reaction: {} ms", latency.as_millis());
            }
            Phase::TooEarly | Phase::Result => {
                self.state.phase = Phase::Waiting;
            }
        }
    }

    fn panel(&self) -> (Color, &'static str, String, Option<&'static str>) {
        match self.state.phase {
            Phase::Waiting => (Color::Rgb(30, 41, 59), "⚡", "Press SPACE to Start".to_string(), None),
            Phase::Armed => (Color::Rgb(185, 28, 28), "🔴", "Wait for green...".to_string(), None),
            Phase::Ready => (Color::Rgb(22, 163, 74), "🟢", "PRESS NOW!".to_string(), None),
            Phase::TooEarly => (Color::Rgb(234, 88, 12), "😬", "Too early!".to_string(), Some("Press SPACE to try again")),
            Phase::Result => {
                let ms = self.state.last.map_or(0, |d| d.as_millis());
                (Color::Rgb(37, 99, 235), "🎯", format!("{}ms", ms), Some("Press SPACE to try again"))
            }
        }
    }
}

impl Game for Reaction {
    fn update(&mut self, now: Instant) {
        if self.state.phase == Phase::Armed && self.go_signal.fire(now) {
            self.state.phase = Phase::Ready;
            self.state.go_at = Some(now);
        }
    }

    fn handle_input(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.click(now),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(now),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(234, 179, 8)))
            .title(" ⚡ Reaction Time ")
            .title_style(Style::default().fg(Color::Rgb(253, 224, 71)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(9), Constraint::Length(1)])
            .split(inner);

        let best = match self.state.best {
            Some(d) => format!(" Best: {}ms ", d.as_millis()),
            None => " Best: --- ".to_string(),
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                best,
                Style::default().fg(Color::Rgb(250, 204, 21)).add_modifier(Modifier::BOLD),
            ))),
            chunks[0],
        );

        let (bg, icon, title, sub) = self.panel();
        let pad = centered(chunks[1], 40, 13);
        let panel = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::White))
            .style(Style::default().bg(bg));
        let panel_inner = panel.inner(pad);
        frame.render_widget(panel, pad);

        let mut lines = vec![Line::from(""); (panel_inner.height.saturating_sub(4) / 2) as usize];
        lines.push(Line::from(icon));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        if let Some(sub) = sub {
            lines.push(Line::from(Span::styled(sub, Style::default().fg(Color::Rgb(226, 232, 240)))));
        }
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), panel_inner);

        frame.render_widget(
            Paragraph::new(help_line(&[("SPACE", "Click"), ("R", "Reset best"), ("Esc", "Menu")])),
            chunks[2],
        );
    }

    /// Clears the session including the best time.
    fn reset(&mut self, _now: Instant) {
        self.state = ReactionState {
            phase: Phase::Waiting,
            go_at: None,
            last: None,
            best: None,
        };
        self.go_signal.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn arming_delay_is_within_range() {
        for seed in 0..50 {
            let t0 = Instant::now();
            let mut r = Reaction::with_seed(seed);
            r.click(t0);
            assert_eq!(r.state().phase, Phase::Armed);
            r.update(t0 + 1999 * MS);
            assert_eq!(r.state().phase, Phase::Armed);
            r.update(t0 + 5000 * MS);
            assert_eq!(r.state().phase, Phase::Ready);
        }
    }

    #[test]
    fn click_while_armed_is_a_false_start() {
        let t0 = Instant::now();
        let mut r = Reaction::with_seed(1);
        r.click(t0);
        r.click(t0 + 1999 * MS);
        assert_eq!(r.state().phase, Phase::TooEarly);

        // The cancelled go signal never flips the screen green.
        r.update(t0 + 10_000 * MS);
        assert_eq!(r.state().phase, Phase::TooEarly);
        r.click(t0 + 10_000 * MS);
        assert_eq!(r.state().phase, Phase::Waiting);
    }

    #[test]
    fn latency_is_measured_from_go_signal() {
        let t0 = Instant::now();
        let mut r = Reaction::with_seed(2);
        r.click(t0);
        let go = t0 + 5000 * MS;
        r.update(go);
        assert_eq!(r.state().go_at, Some(go));
        r.click(go + 250 * MS);
        assert_eq!(r.state().phase, Phase::Result);
        assert_eq!(r.state().last, Some(250 * MS));
        assert_eq!(r.state().best, Some(250 * MS));
    }

    #[test]
    fn best_only_improves() {
        let t0 = Instant::now();
        let mut r = Reaction::with_seed(3);
        let mut now = t0;
        for latency in [300u32, 200, 400] {
            r.click(now);
            now += 5000 * MS;
            r.update(now);
            now += latency * MS;
            r.click(now);
            r.click(now);
            assert_eq!(r.state().phase, Phase::Waiting);
        }
        assert_eq!(r.state().last, Some(400 * MS));
        assert_eq!(r.state().best, Some(200 * MS));
    }

    #[test]
    fn unrelated_keys_change_nothing() {
        let t0 = Instant::now();
        let mut r = Reaction::with_seed(4);
        r.click(t0);
        let before = r.state().clone();
        r.handle_input(KeyEvent::from(KeyCode::Char('x')), t0);
        r.handle_input(KeyEvent::from(KeyCode::Char('x')), t0);
        assert_eq!(r.state(), &before);
    }
}
