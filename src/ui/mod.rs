pub mod home;
pub mod tabs;

use ratatui::prelude::*;

use crate::app::App;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),   // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    match app.session.as_mut() {
        Some(game) => game.render(frame, chunks[1]),
        None => home::render_home(frame, chunks[1], app.selected_game),
    }
}
