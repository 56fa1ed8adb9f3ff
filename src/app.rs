use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::games::memory::Memory;
use crate::games::reaction::Reaction;
use crate::games::snake::Snake;
use crate::games::tictactoe::TicTacToe;
use crate::games::whack::WhackAMole;
use crate::games::Game;

pub const GAME_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Home,
    Snake,
    Memory,
    TicTacToe,
    Reaction,
    WhackAMole,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Snake, Tab::Memory, Tab::TicTacToe, Tab::Reaction, Tab::WhackAMole]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::Snake => " Snake ",
            Tab::Memory => " Memory ",
            Tab::TicTacToe => " Tic Tac Toe ",
            Tab::Reaction => " Reaction ",
            Tab::WhackAMole => " Whack-a-Mole ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Snake => 1,
            Tab::Memory => 2,
            Tab::TicTacToe => 3,
            Tab::Reaction => 4,
            Tab::WhackAMole => 5,
        }
    }

    /// The game behind the `n`th menu tile.
    pub fn game(n: usize) -> Tab {
        Tab::all().get(n + 1).copied().unwrap_or(Tab::Home)
    }

    /// A brand-new session for this tab; `None` for the menu.
    fn open(&self) -> Option<Box<dyn Game>> {
        match self {
            Tab::Home => None,
            Tab::Snake => Some(Box::new(Snake::new())),
            Tab::Memory => Some(Box::new(Memory::new())),
            Tab::TicTacToe => Some(Box::new(TicTacToe::new())),
            Tab::Reaction => Some(Box::new(Reaction::new())),
            Tab::WhackAMole => Some(Box::new(WhackAMole::new())),
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize, // 0-4 for home screen game selection
    /// The one live game. Replacing or clearing it drops its timers.
    pub session: Option<Box<dyn Game>>,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            session: None,
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if let Some(game) = self.session.as_mut() {
            game.update(now);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if matches!(self.current_tab, Tab::Home) {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if !matches!(self.current_tab, Tab::Home) {
                    self.switch_to(Tab::Home);
                    return;
                }
            }
            _ => {}
        }

        if matches!(self.current_tab, Tab::Home) {
            match key.code {
                KeyCode::Char(c @ '1'..='5') => {
                    self.selected_game = c as usize - '1' as usize;
                    self.switch_to(Tab::game(self.selected_game));
                }
                // Tiles are laid out 3 on top, 2 below
                KeyCode::Right => self.selected_game = (self.selected_game + 1) % GAME_COUNT,
                KeyCode::Left => self.selected_game = (self.selected_game + GAME_COUNT - 1) % GAME_COUNT,
                KeyCode::Down | KeyCode::Up => {
                    self.selected_game = if self.selected_game < 3 {
                        (self.selected_game + 3).min(GAME_COUNT - 1)
                    } else {
                        self.selected_game - 3
                    };
                }
                KeyCode::Enter => self.switch_to(Tab::game(self.selected_game)),
                _ => {}
            }
            return;
        }

        // Forward to active game. Timers due by the key's timestamp fire
        // first so the key sees the state the player saw.
        if let Some(game) = self.session.as_mut() {
            game.update(now);
            game.handle_input(key, now);
            game.update(now);
        }
    }

    /// Tears down the current session and opens `tab` fresh.
    fn switch_to(&mut self, tab: Tab) {
        if self.session.is_some() {
            log::info!("closing{}session", self.current_tab.title());
        }
        self.session = tab.open();
        self.current_tab = tab;
        if self.session.is_some() {
            log::info!("opening{}session", tab.title());
            self.selected_game = tab.index() - 1;
        }
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + 1) % tabs.len()]);
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + tabs.len() - 1) % tabs.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::from(code), Instant::now());
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| crate::ui::render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn key_after_go_signal_counts_as_a_reaction() {
        let t0 = Instant::now();
        let mut app = App::new();
        app.on_key(KeyEvent::from(KeyCode::Char('4')), t0);
        app.on_key(KeyEvent::from(KeyCode::Char(' ')), t0);
        assert!(screen_text(&mut app).contains("Wait for green"));

        // No tick between the two presses: the go signal is only seen
        // through the second key's timestamp.
        app.on_key(KeyEvent::from(KeyCode::Char(' ')), t0 + Duration::from_secs(6));
        let text = screen_text(&mut app);
        assert!(!text.contains("Too early"));
        assert!(text.contains("Best: 0ms"));
    }

    #[test]
    fn number_keys_launch_games_from_home() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_tab, Tab::TicTacToe);
        assert!(app.session.is_some());
    }

    #[test]
    fn escape_drops_the_session() {
        let mut app = App::new();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.current_tab, Tab::Snake);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_tab, Tab::Home);
        assert!(app.session.is_none());
    }

    #[test]
    fn tab_cycles_through_games_and_home() {
        let mut app = App::new();
        for expected in &Tab::all()[1..] {
            press(&mut app, KeyCode::Tab);
            assert_eq!(app.current_tab, *expected);
            assert!(app.session.is_some());
        }
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_tab, Tab::Home);
        assert!(app.session.is_none());
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_tab, Tab::WhackAMole);
    }

    #[test]
    fn home_selection_wraps_over_five_tiles() {
        let mut app = App::new();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected_game, 4);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_game, 1);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_game, 4);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.current_tab, Tab::WhackAMole);
    }

    #[test]
    fn q_only_quits_from_home() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
