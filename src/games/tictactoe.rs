use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{centered, digit_cell, entropy_rng, help_line, Cursor, Game};
use crate::timer::Timeout;

pub const MACHINE_DELAY: Duration = Duration::from_millis(500);

/// The 8 winning triples: rows, columns, diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];
const CENTER: usize = 4;
const CORNERS: [usize; 4] = [0, 2, 6, 8];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

pub type Board = [Option<Mark>; 9];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Winner(Mark),
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    TwoPlayer,
    VsComputer,
}

/// The human always plays X against the computer.
pub const HUMAN: Mark = Mark::X;
pub const MACHINE: Mark = Mark::O;

/// Winner if any triple is uniform, draw if the board is full, else `None`.
pub fn evaluate(board: &Board) -> Option<Outcome> {
    for [a, b, c] in LINES {
        if let Some(m) = board[a] {
            if board[b] == Some(m) && board[c] == Some(m) {
                return Some(Outcome::Winner(m));
            }
        }
    }
    if board.iter().all(Option::is_some) {
        Some(Outcome::Draw)
    } else {
        None
    }
}

/// The empty cell of a triple holding exactly two of `mark` and one gap.
fn completing_cell(board: &Board, mark: Mark) -> Option<usize> {
    LINES.iter().find_map(|line| {
        let mine = line.iter().filter(|&&i| board[i] == Some(mark)).count();
        let gap = line.iter().copied().find(|&i| board[i].is_none());
        if mine == 2 { gap } else { None }
    })
}

/// Greedy one-ply choice: win, block, center, random corner, random cell.
///
/// Not a full search; a double threat set up two moves ahead will beat it.
/// Returns `None` only on a full board.
pub fn machine_move<R: Rng + ?Sized>(board: &Board, me: Mark, rng: &mut R) -> Option<usize> {
    if let Some(i) = completing_cell(board, me) {
        return Some(i);
    }
    if let Some(i) = completing_cell(board, me.other()) {
        return Some(i);
    }
    if board[CENTER].is_none() {
        return Some(CENTER);
    }
    let corners: Vec<usize> = CORNERS.iter().copied().filter(|&i| board[i].is_none()).collect();
    if let Some(&i) = corners.choose(rng) {
        return Some(i);
    }
    let open: Vec<usize> = (0..9).filter(|&i| board[i].is_none()).collect();
    open.choose(rng).copied()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicTacToeState {
    pub board: Board,
    pub turn: Mark,
    pub result: Option<Outcome>,
    pub mode: Option<Mode>,
    pub thinking: bool,
}

impl TicTacToeState {
    fn fresh(mode: Option<Mode>) -> Self {
        Self {
            board: [None; 9],
            turn: Mark::X,
            result: None,
            mode,
            thinking: false,
        }
    }
}

pub struct TicTacToe {
    state: TicTacToeState,
    rng: ChaCha8Rng,
    machine_turn: Timeout,
    cursor: Cursor,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self::with_rng(entropy_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            state: TicTacToeState::fresh(None),
            rng,
            machine_turn: Timeout::idle(),
            cursor: Cursor::new(3, 3),
        }
    }

    pub fn state(&self) -> &TicTacToeState {
        &self.state
    }

    pub fn select_mode(&mut self, mode: Mode) {
        if self.state.mode.is_none() {
            self.state = TicTacToeState::fresh(Some(mode));
        }
    }

    /// Back to mode selection, abandoning the current game.
    pub fn change_mode(&mut self) {
        self.state = TicTacToeState::fresh(None);
        self.machine_turn.cancel();
    }

    /// Places the mark whose turn it is. Ignored before a mode is chosen,
    /// after a result, while the computer deliberates, or on a taken cell.
    pub fn place(&mut self, index: usize, now: Instant) {
        let Some(mode) = self.state.mode else { return };
        if index >= 9
            || self.state.board[index].is_some()
            || self.state.result.is_some()
            || self.state.thinking
        {
            return;
        }
        if mode == Mode::VsComputer && self.state.turn != HUMAN {
            return;
        }

        self.state.board[index] = Some(self.state.turn);
        self.state.result = evaluate(&self.state.board);
        if self.state.result.is_some() {
            log::debug!("tictactoe: finished with {:?}", self.state.result);
            return;
        }

        self.state.turn = self.state.turn.other();
        if mode == Mode::VsComputer {
            self.state.thinking = true;
            self.machine_turn.schedule(now, MACHINE_DELAY);
        }
    }

    fn play_machine(&mut self) {
        if let Some(i) = machine_move(&self.state.board, MACHINE, &mut self.rng) {
            log::debug!("tictactoe: computer takes cell {}", i);
            self.state.board[i] = Some(MACHINE);
            self.state.result = evaluate(&self.state.board);
        }
        self.state.turn = HUMAN;
        self.state.thinking = false;
    }

    fn status_line(&self) -> Line<'static> {
        let vs_computer = self.state.mode == Some(Mode::VsComputer);
        let (text, color) = match self.state.result {
            Some(Outcome::Draw) => ("It's a Draw!".to_string(), Color::Yellow),
            Some(Outcome::Winner(m)) if vs_computer => {
                if m == HUMAN {
                    ("You Win! 🎉".to_string(), Color::Green)
                } else {
                    ("Computer Wins! 🤖".to_string(), Color::Red)
                }
            }
            Some(Outcome::Winner(m)) => (format!("{} Wins! 🎉", m.symbol()), Color::Green),
            None if self.state.thinking => ("Computer thinking...".to_string(), Color::Rgb(196, 181, 253)),
            None => {
                let you = if vs_computer && self.state.turn == HUMAN { " (You)" } else { "" };
                (format!("{}'s Turn{}", self.state.turn.symbol(), you), Color::White)
            }
        };
        let mode = if vs_computer { "🤖 vs Computer" } else { "👥 vs Player" };
        Line::from(vec![
            Span::styled(format!(" {} ", text), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(mode, Style::default().fg(Color::Rgb(148, 163, 184))),
        ])
    }

    fn render_mode_select(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Choose Game Mode",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[1] ", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
                Span::styled("👥 vs Player", Style::default().fg(Color::Rgb(59, 130, 246)).add_modifier(Modifier::BOLD)),
                Span::raw("     "),
                Span::styled("[2] ", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
                Span::styled("🤖 vs Computer", Style::default().fg(Color::Rgb(168, 85, 247)).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "vs Player: Take turns with a friend",
                Style::default().fg(Color::Rgb(148, 163, 184)),
            )),
            Line::from(Span::styled(
                "vs Computer: Play against AI (you're X)",
                Style::default().fg(Color::Rgb(148, 163, 184)),
            )),
        ];
        let box_area = centered(area, 50, 9);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), box_area);
    }

    fn render_board(&self, frame: &mut Frame, area: Rect) {
        let board = centered(area, 30, 15);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(board);
        for (r, row_area) in rows.iter().enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 3); 3])
                .split(*row_area);
            for (c, cell_area) in cols.iter().enumerate() {
                let index = r * 3 + c;
                let selected = self.cursor.index == index && self.state.result.is_none();
                let (text, bg) = match self.state.board[index] {
                    Some(Mark::X) => ("X", Color::Rgb(59, 130, 246)),
                    Some(Mark::O) => ("O", Color::Rgb(236, 72, 153)),
                    None => ("", Color::Rgb(51, 65, 85)),
                };
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_type(if selected { BorderType::Double } else { BorderType::Rounded })
                    .border_style(Style::default().fg(if selected { Color::Rgb(255, 220, 80) } else { Color::Rgb(30, 41, 59) }))
                    .style(Style::default().bg(bg));
                let inner = block.inner(*cell_area);
                frame.render_widget(block, *cell_area);
                let mut lines = vec![Line::from(""); (inner.height.saturating_sub(1) / 2) as usize];
                lines.push(Line::from(Span::styled(
                    text,
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )));
                frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
            }
        }
    }
}

impl Game for TicTacToe {
    fn update(&mut self, now: Instant) {
        if self.machine_turn.fire(now) {
            self.play_machine();
        }
    }

    fn handle_input(&mut self, key: KeyEvent, now: Instant) {
        if self.state.mode.is_none() {
            match key.code {
                KeyCode::Char('1') => self.select_mode(Mode::TwoPlayer),
                KeyCode::Char('2') => self.select_mode(Mode::VsComputer),
                _ => {}
            }
            return;
        }
        if self.state.result.is_some() {
            match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => self.reset(now),
                KeyCode::Char('m') | KeyCode::Char('M') => self.change_mode(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(now),
            KeyCode::Char('m') | KeyCode::Char('M') => self.change_mode(),
            KeyCode::Enter | KeyCode::Char(' ') => self.place(self.cursor.index, now),
            code => {
                if let Some(i) = digit_cell(code) {
                    self.cursor.index = i;
                    self.place(i, now);
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
            .border_style(Style::default().fg(Color::Rgb(59, 130, 246)))
            .title(" ⭕ Tic Tac Toe ")
            .title_style(Style::default().fg(Color::Rgb(103, 232, 249)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(9), Constraint::Length(1)])
            .split(inner);

        if self.state.mode.is_none() {
            self.render_mode_select(frame, chunks[1]);
            frame.render_widget(
                Paragraph::new(help_line(&[("1", "vs Player"), ("2", "vs Computer"), ("Esc", "Menu")])),
                chunks[2],
            );
            return;
        }

        frame.render_widget(Paragraph::new(self.status_line()), chunks[0]);
        self.render_board(frame, chunks[1]);

        let help = if self.state.result.is_some() {
            help_line(&[("ENTER", "Play again"), ("M", "Change mode"), ("Esc", "Menu")])
        } else {
            help_line(&[("1-9/SPACE", "Place"), ("↑↓←→", "Select"), ("M", "Change mode"), ("Esc", "Menu")])
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    /// New board in the same mode.
    fn reset(&mut self, _now: Instant) {
        self.state = TicTacToeState::fresh(self.state.mode);
        self.machine_turn.cancel();
        self.cursor = Cursor::new(3, 3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const X: Option<Mark> = Some(Mark::X);
    const O: Option<Mark> = Some(Mark::O);
    const E: Option<Mark> = None;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn reference_evaluate(board: &Board) -> Option<Outcome> {
        let mut winner = None;
        for line in LINES {
            let cells: Vec<Option<Mark>> = line.iter().map(|&i| board[i]).collect();
            if cells[0].is_some() && cells.iter().all(|&c| c == cells[0]) {
                winner = winner.or(cells[0]);
            }
        }
        match winner {
            Some(m) => Some(Outcome::Winner(m)),
            None if board.iter().all(|c| c.is_some()) => Some(Outcome::Draw),
            None => None,
        }
    }

    fn cell() -> impl Strategy<Value = Option<Mark>> {
        prop_oneof![Just(None), Just(Some(Mark::X)), Just(Some(Mark::O))]
    }

    proptest! {
        #[test]
        fn evaluate_matches_brute_force(cells in proptest::array::uniform9(cell())) {
            prop_assert_eq!(evaluate(&cells), reference_evaluate(&cells));
        }

        #[test]
        fn machine_always_picks_an_empty_cell(cells in proptest::array::uniform9(cell()), seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match machine_move(&cells, Mark::O, &mut rng) {
                Some(i) => prop_assert!(cells[i].is_none()),
                None => prop_assert!(cells.iter().all(|c| c.is_some())),
            }
        }
    }

    #[test]
    fn evaluate_examples() {
        assert_eq!(evaluate(&[X, X, X, E, E, E, E, E, E]), Some(Outcome::Winner(Mark::X)));
        assert_eq!(evaluate(&[O, X, X, E, O, E, E, E, O]), Some(Outcome::Winner(Mark::O)));
        assert_eq!(evaluate(&[X, O, X, X, O, O, O, X, X]), Some(Outcome::Draw));
        assert_eq!(evaluate(&[X, O, E, E, E, E, E, E, E]), None);
    }

    #[test]
    fn machine_blocks_two_in_a_row() {
        assert_eq!(machine_move(&[X, X, E, E, E, E, E, E, E], Mark::O, &mut rng()), Some(2));
    }

    #[test]
    fn machine_prefers_winning_over_blocking() {
        let board = [X, X, E, O, O, E, E, E, E];
        assert_eq!(machine_move(&board, Mark::O, &mut rng()), Some(5));
    }

    #[test]
    fn machine_takes_center_then_corner() {
        assert_eq!(machine_move(&[X, E, E, E, E, E, E, E, E], Mark::O, &mut rng()), Some(4));
        let corner = machine_move(&[E, E, E, E, X, E, E, E, E], Mark::O, &mut rng()).unwrap();
        assert!(CORNERS.contains(&corner));
    }

    #[test]
    fn machine_falls_back_to_any_empty_cell() {
        // Center and corners taken, no triple completable by either side.
        let board = [X, O, X, E, O, E, O, X, O];
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let pick = machine_move(&board, Mark::O, &mut rng);
            assert!(pick == Some(3) || pick == Some(5));
        }
        assert_eq!(machine_move(&[X, O, X, X, O, O, O, X, X], Mark::O, &mut rng()), None);
    }

    #[test]
    fn two_player_alternates_marks() {
        let t0 = Instant::now();
        let mut g = TicTacToe::with_seed(1);
        g.select_mode(Mode::TwoPlayer);
        g.place(0, t0);
        g.place(4, t0);
        assert_eq!(g.state().board[0], X);
        assert_eq!(g.state().board[4], O);
        assert_eq!(g.state().turn, Mark::X);
        assert!(!g.state().thinking);
    }

    #[test]
    fn placing_before_mode_select_is_ignored() {
        let mut g = TicTacToe::with_seed(2);
        let before = g.state().clone();
        g.place(0, Instant::now());
        assert_eq!(g.state(), &before);
    }

    #[test]
    fn occupied_cell_and_finished_board_ignore_input() {
        let t0 = Instant::now();
        let mut g = TicTacToe::with_seed(3);
        g.select_mode(Mode::TwoPlayer);
        g.place(0, t0);
        let before = g.state().clone();
        g.place(0, t0);
        g.place(0, t0);
        assert_eq!(g.state(), &before);

        for i in [3, 1, 4, 2] {
            g.place(i, t0);
        }
        assert_eq!(g.state().result, Some(Outcome::Winner(Mark::X)));
        let done = g.state().clone();
        g.place(8, t0);
        assert_eq!(g.state(), &done);
    }

    #[test]
    fn computer_replies_after_delay_and_blocks_input_meanwhile() {
        let t0 = Instant::now();
        let mut g = TicTacToe::with_seed(4);
        g.select_mode(Mode::VsComputer);
        g.place(0, t0);
        assert!(g.state().thinking);
        assert_eq!(g.state().turn, Mark::O);

        let before = g.state().clone();
        g.place(1, t0);
        assert_eq!(g.state(), &before);

        g.update(t0 + MACHINE_DELAY / 2);
        assert!(g.state().thinking);
        g.update(t0 + MACHINE_DELAY);
        assert!(!g.state().thinking);
        assert_eq!(g.state().turn, Mark::X);
        assert_eq!(g.state().board[4], O);
    }

    #[test]
    fn changing_mode_cancels_pending_machine_move() {
        let t0 = Instant::now();
        let mut g = TicTacToe::with_seed(5);
        g.select_mode(Mode::VsComputer);
        g.place(0, t0);
        g.change_mode();
        g.select_mode(Mode::TwoPlayer);
        g.update(t0 + MACHINE_DELAY * 4);
        assert!(g.state().board.iter().all(Option::is_none));
    }

    #[test]
    fn human_win_skips_machine_turn() {
        let t0 = Instant::now();
        let mut g = TicTacToe::with_seed(6);
        g.select_mode(Mode::VsComputer);
        g.state.board = [X, X, E, O, O, E, E, E, E];
        g.place(2, t0);
        assert_eq!(g.state().result, Some(Outcome::Winner(Mark::X)));
        assert!(!g.state().thinking);
    }
}
