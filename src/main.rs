use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use rustcade_mini::app::App;
use rustcade_mini::event::{Event, EventHandler};
use rustcade_mini::ui;

type Term = Terminal<CrosstermBackend<Stdout>>;

fn main() -> Result<()> {
    // No `log` backend is installed: the alternate screen owns stdout and
    // stderr, so log records are dropped here. Embedders and tests that
    // want them install their own logger before driving `App`.

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run(&mut terminal);

    // Always try to restore the terminal, even when the loop failed
    let restored = restore(&mut terminal);
    result.and(restored)
}

fn run(terminal: &mut Term) -> Result<()> {
    let mut app = App::new();
    let event_handler = EventHandler::new(16); // ~60 FPS

    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        match event_handler.next()? {
            Event::Tick(now) => app.on_tick(now),
            Event::Key(key, now) => app.on_key(key, now),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn restore(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
