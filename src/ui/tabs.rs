use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};

/// Tab bar. The live session's tab is lit; every other tab is only a
/// destination, since switching to it starts that game from scratch.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            if *t == app.current_tab {
                let marker = if app.session.is_some() { "▶" } else { "⌂" };
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Rgb(74, 222, 128))),
                    Span::styled(t.title(), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
                ])
            } else {
                Line::from(Span::styled(format!(" {}", t.title()), Style::default().fg(Color::Rgb(100, 116, 139))))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Rgb(139, 92, 246)))
                .title(" 🎮 Game Arcade ")
                .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD))
                .title_bottom(
                    Line::from(Span::styled(
                        " Tab/Shift+Tab switch · Esc menu ",
                        Style::default().fg(Color::Rgb(71, 85, 105)),
                    ))
                    .right_aligned(),
                ),
        )
        .select(app.current_tab.index())
        .divider(Span::styled("│", Style::default().fg(Color::Rgb(51, 65, 85))));

    frame.render_widget(tabs, area);
}
