use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{entropy_rng, help_line, Game};
use crate::timer::{Interval, Timeout};

pub const GRID_SIZE: i32 = 20;
const ORIGIN: Cell = Cell { row: 5, col: 5 };
const FIRST_FOOD: Cell = Cell { row: 10, col: 10 };
const START_LIVES: u32 = 2;
pub const FOOD_REWARD: u32 = 10;
pub const TICK_PERIOD: Duration = Duration::from_millis(150);
const HIT_FLASH: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    fn in_bounds(self) -> bool {
        (0..GRID_SIZE).contains(&self.row) && (0..GRID_SIZE).contains(&self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (-1, 0),
            Heading::Down => (1, 0),
            Heading::Left => (0, -1),
            Heading::Right => (0, 1),
        }
    }

    fn opposite(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    fn from_key(code: KeyCode) -> Option<Heading> {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Heading::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Heading::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Heading::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Heading::Right),
            _ => None,
        }
    }
}

/// Everything the board shows. Head is the front of `body`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeState {
    pub body: VecDeque<Cell>,
    pub food: Cell,
    pub direction: Heading,
    pub lives: u32,
    pub score: u32,
    pub started: bool,
    pub over: bool,
    pub hit_flash: bool,
}

impl SnakeState {
    fn fresh(food: Cell) -> Self {
        Self {
            body: VecDeque::from([ORIGIN]),
            food,
            direction: Heading::Right,
            lives: START_LIVES,
            score: 0,
            started: false,
            over: false,
            hit_flash: false,
        }
    }

    pub fn head(&self) -> Cell {
        self.body.front().copied().unwrap_or(ORIGIN)
    }
}

pub struct Snake {
    state: SnakeState,
    rng: ChaCha8Rng,
    ticker: Interval,
    flash: Timeout,
}

impl Snake {
    pub fn new() -> Self {
        Self::with_rng(entropy_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            state: SnakeState::fresh(FIRST_FOOD),
            rng,
            ticker: Interval::new(TICK_PERIOD),
            flash: Timeout::idle(),
        }
    }

    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    /// Fresh single-cell snake, new food, full lives, and the tick running.
    pub fn start(&mut self, now: Instant) {
        let food = self.random_cell();
        self.state = SnakeState::fresh(food);
        self.state.started = true;
        self.flash.cancel();
        self.ticker.start(now);
    }

    /// Turns the snake unless the request is an exact reversal.
    pub fn set_direction(&mut self, dir: Heading) {
        if !self.state.started || self.state.over {
            return;
        }
        if dir != self.state.direction.opposite() {
            self.state.direction = dir;
        }
    }

    /// Advances the snake one cell.
    pub fn tick(&mut self, now: Instant) {
        if !self.state.started || self.state.over {
            return;
        }
        let head = self.state.head();
        let (dr, dc) = self.state.direction.delta();
        let next = Cell::new(head.row + dr, head.col + dc);

        if !next.in_bounds() || self.state.body.contains(&next) {
            self.lose_life(now);
            return;
        }

        self.state.body.push_front(next);
        if next == self.state.food {
            self.state.score += FOOD_REWARD;
            // Food may land under the body; it stays there until the head reaches it.
            self.state.food = self.random_cell();
        } else {
            self.state.body.pop_back();
        }
    }

    fn lose_life(&mut self, now: Instant) {
        self.state.hit_flash = true;
        self.flash.schedule(now, HIT_FLASH);
        if self.state.lives <= 1 {
            self.state.lives = 0;
            self.state.over = true;
            self.ticker.stop();
            log::debug!("snake: game over with score {}", self.state.score);
            return;
        }
        self.state.lives -= 1;
        self.state.body = VecDeque::from([ORIGIN]);
        self.state.direction = Heading::Right;
    }

    fn random_cell(&mut self) -> Cell {
        Cell::new(self.rng.gen_range(0..GRID_SIZE), self.rng.gen_range(0..GRID_SIZE))
    }

    fn render_board(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let bg = Color::Rgb(30, 41, 59);
        let board_w = GRID_SIZE as usize * 2;
        let pad = width.saturating_sub(board_w) / 2;
        let mut lines = Vec::with_capacity(height);
        for row in 0..GRID_SIZE.min(height as i32) {
            let mut spans = vec![Span::raw(" ".repeat(pad))];
            for col in 0..GRID_SIZE {
                let cell = Cell::new(row, col);
                let (text, style) = if cell == self.state.head() {
                    ("██", Style::default().fg(Color::Rgb(74, 222, 128)))
                } else if self.state.body.contains(&cell) {
                    ("▓▓", Style::default().fg(Color::Rgb(34, 197, 94)))
                } else if cell == self.state.food {
                    ("● ", Style::default().fg(Color::Rgb(239, 68, 68)).add_modifier(Modifier::BOLD))
                } else {
                    ("· ", Style::default().fg(Color::Rgb(71, 85, 105)))
                };
                spans.push(Span::styled(text, style.bg(bg)));
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

impl Game for Snake {
    fn update(&mut self, now: Instant) {
        if self.flash.fire(now) {
            self.state.hit_flash = false;
        }
        while self.ticker.fire(now) {
            self.tick(now);
        }
    }

    fn handle_input(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(now),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if !self.state.started || self.state.over {
                    self.start(now);
                }
            }
            code => {
                if let Some(dir) = Heading::from_key(code) {
                    self.set_direction(dir);
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.state.hit_flash {
            Color::Rgb(239, 68, 68)
        } else {
            Color::Rgb(34, 197, 94)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if self.state.hit_flash { BorderType::Thick } else { BorderType::Rounded })
            .border_style(Style::default().fg(border))
            .title(" 🐍 Snake ")
            .title_style(Style::default().fg(Color::Rgb(74, 222, 128)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(GRID_SIZE as u16), Constraint::Length(1)])
            .split(inner);

        let status = Line::from(vec![
            Span::styled(
                format!(" Score: {} ", self.state.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Lives: {}", "♥ ".repeat(self.state.lives as usize)),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Length: {}", self.state.body.len()),
                Style::default().fg(Color::Green),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let board = self.render_board(chunks[1].width as usize, chunks[1].height as usize);
        frame.render_widget(Paragraph::new(board), chunks[1]);

        let footer = if self.state.over {
            Line::from(vec![
                Span::styled(
                    format!(" 💀 GAME OVER! Score: {} ", self.state.score),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled("Press ENTER to play again, Esc for menu", Style::default().fg(Color::Gray)),
            ])
        } else if !self.state.started {
            help_line(&[("ENTER", "Start game"), ("Esc", "Menu")])
        } else {
            let left = if self.state.lives == 1 { "life" } else { "lives" };
            let mut line = help_line(&[("↑↓←→/WASD", "Move"), ("R", "Restart"), ("Esc", "Menu")]);
            line.spans.push(Span::styled(
                format!("│ {} {} left", self.state.lives, left),
                Style::default().fg(Color::Rgb(148, 163, 184)),
            ));
            line
        };
        frame.render_widget(Paragraph::new(footer), chunks[2]);
    }

    fn reset(&mut self, now: Instant) {
        self.start(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u64) -> (Snake, Instant) {
        let t0 = Instant::now();
        let mut s = Snake::with_seed(seed);
        s.start(t0);
        (s, t0)
    }

    #[test]
    fn start_places_single_cell_at_origin() {
        let (s, _) = started(1);
        assert_eq!(s.state().body, VecDeque::from([Cell::new(5, 5)]));
        assert_eq!(s.state().lives, 2);
        assert_eq!(s.state().score, 0);
        assert_eq!(s.state().direction, Heading::Right);
        assert!(s.state().started && !s.state().over);
        assert!(s.state().food.in_bounds());
    }

    #[test]
    fn ticks_are_ignored_before_start() {
        let mut s = Snake::with_seed(3);
        let before = s.state().clone();
        s.tick(Instant::now());
        s.set_direction(Heading::Down);
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn tick_moves_head_and_keeps_length() {
        let (mut s, t0) = started(2);
        s.state.food = Cell::new(0, 0);
        s.tick(t0);
        assert_eq!(s.state().body, VecDeque::from([Cell::new(5, 6)]));
    }

    #[test]
    fn reverse_direction_is_ignored() {
        let (mut s, _) = started(4);
        let before = s.state().clone();
        s.set_direction(Heading::Left);
        assert_eq!(s.state(), &before);
        s.set_direction(Heading::Left);
        assert_eq!(s.state(), &before);
        s.set_direction(Heading::Up);
        assert_eq!(s.state().direction, Heading::Up);
    }

    #[test]
    fn eating_food_grows_by_one_and_scores() {
        let (mut s, t0) = started(5);
        s.state.food = Cell::new(5, 6);
        s.tick(t0);
        assert_eq!(s.state().score, FOOD_REWARD);
        assert_eq!(s.state().body.len(), 2);
        assert_eq!(s.state().head(), Cell::new(5, 6));

        // Growth happens on the eating tick only.
        s.state.food = Cell::new(0, 0);
        s.tick(t0);
        assert_eq!(s.state().body.len(), 2);
        assert_eq!(s.state().score, FOOD_REWARD);
    }

    #[test]
    fn self_collision_costs_a_life_and_respawns() {
        let (mut s, t0) = started(6);
        s.state.food = Cell::new(19, 19);
        // A body curled so that moving down from the head re-enters it.
        s.state.body = VecDeque::from([
            Cell::new(5, 5),
            Cell::new(5, 4),
            Cell::new(6, 4),
            Cell::new(6, 5),
            Cell::new(6, 6),
        ]);
        s.state.direction = Heading::Down;
        s.tick(t0);
        assert_eq!(s.state().lives, 1);
        assert_eq!(s.state().body, VecDeque::from([Cell::new(5, 5)]));
        assert_eq!(s.state().direction, Heading::Right);
        assert!(!s.state().over);
        assert!(s.state().hit_flash);
    }

    #[test]
    fn last_life_ends_the_game_and_freezes_state() {
        let (mut s, t0) = started(7);
        s.state.lives = 1;
        s.state.body = VecDeque::from([Cell::new(0, 19)]);
        s.state.direction = Heading::Right;
        s.tick(t0);
        assert!(s.state().over);
        assert_eq!(s.state().lives, 0);

        let frozen = s.state().clone();
        s.tick(t0);
        s.set_direction(Heading::Down);
        assert_eq!(s.state(), &frozen);
    }

    #[test]
    fn wall_hit_uses_ticker_and_flash_clears() {
        let (mut s, t0) = started(8);
        s.state.food = Cell::new(19, 0);
        // 15 steps right reaches column 19; the 15th tick leaves the board.
        s.update(t0 + TICK_PERIOD * 15);
        assert_eq!(s.state().lives, 1);
        assert!(s.state().hit_flash);
        s.update(t0 + TICK_PERIOD * 15 + HIT_FLASH);
        assert!(!s.state().hit_flash);
    }

    #[test]
    fn food_may_spawn_under_the_body() {
        // Food placement draws from the whole grid and is not steered away
        // from occupied cells. With rows 1..20 filled, almost every spawn
        // after eating lands on the body.
        let (mut s, t0) = started(9);
        let mut landed_on_body = false;
        for _ in 0..20 {
            let mut body: VecDeque<Cell> = VecDeque::new();
            for row in 1..GRID_SIZE {
                for col in 0..GRID_SIZE {
                    body.push_back(Cell::new(row, col));
                }
            }
            s.state.body = body;
            s.state.direction = Heading::Up;
            s.state.food = Cell::new(0, 0);
            s.state.over = false;
            s.tick(t0);
            assert_eq!(s.state().head(), Cell::new(0, 0));
            assert!(s.state().food.in_bounds());
            if s.state().body.contains(&s.state().food) {
                landed_on_body = true;
                break;
            }
        }
        assert!(landed_on_body);
    }

    #[test]
    fn food_under_the_body_is_collected_once_uncovered() {
        let (mut s, t0) = started(12);
        s.state.body = VecDeque::from([Cell::new(5, 6), Cell::new(5, 5)]);
        s.state.food = Cell::new(5, 5);
        assert!(s.state().body.contains(&s.state().food));

        // Moving off the tail uncovers the food without eating it.
        s.tick(t0);
        assert_eq!(s.state().body, VecDeque::from([Cell::new(5, 7), Cell::new(5, 6)]));
        assert_eq!(s.state().food, Cell::new(5, 5));
        assert_eq!(s.state().score, 0);

        // Loop back round to the uncovered cell.
        for dir in [Heading::Down, Heading::Left, Heading::Left, Heading::Up] {
            s.set_direction(dir);
            s.tick(t0);
        }
        assert_eq!(s.state().head(), Cell::new(5, 5));
        assert_eq!(s.state().score, FOOD_REWARD);
        assert_eq!(s.state().body.len(), 3);
        assert_eq!(s.state().lives, 2);
    }

    #[test]
    fn keys_map_to_directions_after_start() {
        let (mut s, t0) = started(10);
        s.handle_input(KeyEvent::from(KeyCode::Char('s')), t0);
        assert_eq!(s.state().direction, Heading::Down);
        s.handle_input(KeyEvent::from(KeyCode::Up), t0);
        assert_eq!(s.state().direction, Heading::Down);
        s.handle_input(KeyEvent::from(KeyCode::Left), t0);
        assert_eq!(s.state().direction, Heading::Left);
    }

    #[test]
    fn restart_after_game_over_restores_lives() {
        let (mut s, t0) = started(11);
        s.state.over = true;
        s.state.lives = 0;
        s.handle_input(KeyEvent::from(KeyCode::Enter), t0);
        assert!(!s.state().over);
        assert_eq!(s.state().lives, 2);
    }
}
