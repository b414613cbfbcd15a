pub mod board_scene;
pub mod panels;
pub mod screens;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::game::GameSession;

/// Which full-screen view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiScreen {
    Game,
    Entities,
    Help,
}

/// Top-level draw: dispatches to the active screen and layers end-of-game
/// popups over the board.
pub fn draw(
    frame: &mut Frame,
    session: &GameSession,
    cursor: (usize, usize),
    screen: UiScreen,
    messages: &[String],
) {
    match screen {
        UiScreen::Game => draw_game(frame, session, cursor, messages),
        UiScreen::Entities => screens::render_entities(frame, frame.size(), session),
        UiScreen::Help => screens::render_help(frame, frame.size()),
    }
}

fn draw_game(frame: &mut Frame, session: &GameSession, cursor: (usize, usize), messages: &[String]) {
    let size = frame.size();

    // Split vertically: main content, footer hint line
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    // Split horizontally: board on the left, info panel on the right
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(34)])
        .split(v_chunks[0]);

    board_scene::render_board(frame, h_chunks[0], session, cursor);
    panels::render_side_panel(frame, h_chunks[1], session, messages);
    draw_footer(frame, v_chunks[1]);

    if let Some(info) = session.game_over() {
        screens::render_game_over_popup(frame, h_chunks[0], &info.cause);
    } else if let Some(source) = session.victory() {
        screens::render_victory_popup(frame, h_chunks[0], source);
    }
}

fn draw_footer(frame: &mut Frame, area: ratatui::layout::Rect) {
    let hint = "arrows move | enter click | 1-9/*/f note | c clear | u level up | n new cave | e entities | ? help | q quit";
    let footer = Paragraph::new(Line::from(hint)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}
