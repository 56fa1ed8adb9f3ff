use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::GAME_COUNT;

const BANNER: &str = r#"
  ▄████  ▄▄▄       ███▄ ▄███▓▓█████     ▄▄▄       ██▀███   ▄████▄   ▄▄▄      ▓█████▄ ▓█████
 ██▒ ▀█▒▒████▄    ▓██▒▀█▀ ██▒▓█   ▀    ▒████▄    ▓██ ▒ ██▒▒██▀ ▀█  ▒████▄    ▒██▀ ██▌▓█   ▀
▒██░▄▄▄░▒██  ▀█▄  ▓██    ▓██░▒███      ▒██  ▀█▄  ▓██ ░▄█ ▒▒▓█    ▄ ▒██  ▀█▄  ░██   █▌▒███
░▓█  ██▓░██▄▄▄▄██ ▒██    ▒██ ▒▓█  ▄    ░██▄▄▄▄██ ▒██▀▀█▄  ▒▓▓▄ ▄██▒░██▄▄▄▄██ ░▓█▄   ▌▒▓█  ▄
░▒▓███▀▒ ▓█   ▓██▒▒██▒   ░██▒░▒████▒    ▓█   ▓██▒░██▓ ▒██▒▒ ▓███▀ ░ ▓█   ▓██▒░▒████▓ ░▒████▒"#;

struct GameTile {
    key: &'static str,
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

static GAME_TILES: [GameTile; GAME_COUNT] = [
    GameTile { key: "1", icon: "🐍", name: "Snake", desc: "Eat, grow, and\ndon't bite yourself!", color: Color::Rgb(74, 222, 128), border_color: Color::Rgb(21, 128, 61) },
    GameTile { key: "2", icon: "🧠", name: "Memory Match", desc: "Find all 8 pairs\nin few moves!", color: Color::Rgb(196, 181, 253), border_color: Color::Rgb(109, 40, 217) },
    GameTile { key: "3", icon: "⭕", name: "Tic Tac Toe", desc: "Beat a friend\nor the computer!", color: Color::Rgb(103, 232, 249), border_color: Color::Rgb(14, 116, 144) },
    GameTile { key: "4", icon: "⚡", name: "Reaction Time", desc: "Wait for green,\nthen be quick!", color: Color::Rgb(253, 224, 71), border_color: Color::Rgb(194, 65, 12) },
    GameTile { key: "5", icon: "🔨", name: "Whack-a-Mole", desc: "Bop the moles\nbefore time's up!", color: Color::Rgb(252, 165, 165), border_color: Color::Rgb(190, 24, 93) },
];

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let name_color = if selected { Color::White } else { tile.color };
    let desc_color = if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("[{}] ", tile.key), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(tile.name, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];
    lines.extend(tile.desc.split('\n').map(|d| Line::from(Span::styled(d, Style::default().fg(desc_color)))));
    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to play",
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn key_row(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<17}", key), Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(action, Style::default().fg(Color::Rgb(140, 140, 140))),
    ])
}

fn game_controls(game_idx: usize) -> Vec<Line<'static>> {
    let tile = &GAME_TILES[game_idx.min(GAME_COUNT - 1)];
    let (goal, keys): (&str, Vec<(&'static str, &'static str)>) = match game_idx {
        0 => ("Two lives. Walls and your own tail cost one.", vec![
            ("Enter / Space", "Start"),
            ("↑ ↓ ← → / WASD", "Steer"),
            ("R", "Restart"),
        ]),
        1 => ("Flip two cards; matching pairs stay up.", vec![
            ("↑ ↓ ← → / WASD", "Move cursor"),
            ("Enter / Space", "Flip card"),
            ("R", "Reshuffle"),
        ]),
        2 => ("Three in a row wins. The computer plays O.", vec![
            ("1 / 2", "vs Player / vs Computer"),
            ("1-9 or cursor + Space", "Place mark"),
            ("M", "Change mode"),
        ]),
        3 => ("Press only after the screen turns green.", vec![
            ("Space / Enter", "Start / react"),
            ("R", "Reset best time"),
        ]),
        _ => ("Whack as many moles as you can.", vec![
            ("1 / 2 / 3", "Easy / Medium / Hard"),
            ("1-9 or cursor + Space", "Whack burrow"),
            ("M", "Change difficulty"),
        ]),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {} {}", tile.icon, tile.name),
            Style::default().fg(tile.color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("  {}", goal), Style::default().fg(Color::Rgb(100, 100, 120)))),
        Line::from(""),
    ];
    lines.extend(keys.into_iter().map(|(k, a)| key_row(k, a)));
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, selected_game: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),  // Banner
            Constraint::Length(2),  // Subtitle
            Constraint::Length(14), // Game tiles (3 + 2)
            Constraint::Min(8),     // Controls area
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(168, 85, 247)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "Choose a game to play",
        Style::default().fg(Color::Rgb(148, 163, 184)).add_modifier(Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Games — ↑↓←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    let tile_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(games_inner);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(tile_rows[0]);
    // Bottom pair sits centered under the top three
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 6),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 6),
        ])
        .split(tile_rows[1]);

    for (i, tile) in GAME_TILES.iter().enumerate() {
        let slot = if i < 3 { top[i] } else { bottom[i - 2] };
        render_game_tile(frame, slot, tile, selected_game == i);
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let controls = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "  🔧 Navigation",
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )),
        key_row("Tab / Shift+Tab", "Switch game"),
        key_row("1-5", "Launch game"),
        key_row("Enter", "Play selected"),
        key_row("Esc", "Back to menu"),
        key_row("q / Ctrl+C", "Quit"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, ctrl_cols[0]);

    let tile = &GAME_TILES[selected_game.min(GAME_COUNT - 1)];
    let game_ctrl = Paragraph::new(game_controls(selected_game)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tile.border_color))
            .title(format!(" 🎮 {} Control ", tile.name))
            .title_style(Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(game_ctrl, ctrl_cols[1]);
}
