//! Player panel and message log.

use chrono::{TimeZone, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::game::GameSession;

/// Right-hand column: player stats on top, message log below.
pub fn render_side_panel(frame: &mut Frame, area: Rect, session: &GameSession, messages: &[String]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(area);

    render_player_panel(frame, chunks[0], session);
    render_message_log(frame, chunks[1], messages);
}

fn render_player_panel(frame: &mut Frame, area: Rect, session: &GameSession) {
    let block = Block::default()
        .title(" Adventurer ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Level line
            Constraint::Length(1), // Health gauge
            Constraint::Length(1), // Experience gauge
            Constraint::Length(1), // Level-up hint
            Constraint::Length(1), // Map line
            Constraint::Length(1), // Session start line
        ])
        .split(inner);

    let player = session.player();

    let level_line = Line::from(vec![
        Span::raw("Level "),
        Span::styled(
            player.level.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(level_line), chunks[0]);

    let health_ratio = if player.max_health > 0 {
        player.health as f64 / player.max_health as f64
    } else {
        0.0
    };
    let health_gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Red).bg(Color::Black))
        .ratio(health_ratio)
        .label(format!("HP {}/{}", player.health, player.max_health));
    frame.render_widget(health_gauge, chunks[1]);

    let exp_ratio = if player.exp_to_next_level > 0 {
        (player.experience as f64 / player.exp_to_next_level as f64).min(1.0)
    } else {
        0.0
    };
    let exp_gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue).bg(Color::Black))
        .ratio(exp_ratio)
        .label(format!(
            "XP {}/{}",
            player.experience, player.exp_to_next_level
        ));
    frame.render_widget(exp_gauge, chunks[2]);

    let hint = if player.can_level_up() {
        Line::from(Span::styled(
            "Level up ready! Press u",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            "Fill the XP bar to level up",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(hint), chunks[3]);

    let map_line = Line::from(Span::styled(
        format!(
            "Cave {}/{}",
            session.current_layout_index() + 1,
            session.layout_count()
        ),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(map_line), chunks[4]);

    let started = Utc
        .timestamp_opt(session.started_at(), 0)
        .single()
        .map(|t| t.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string());
    let started_line = Line::from(Span::styled(
        format!("Descended at {started}"),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(started_line), chunks[5]);
}

fn render_message_log(frame: &mut Frame, area: Rect, messages: &[String]) {
    let block = Block::default()
        .title(" Log ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Show the newest messages that fit
    let visible = inner.height as usize;
    let start = messages.len().saturating_sub(visible);
    let lines: Vec<Line> = messages[start..]
        .iter()
        .map(|m| Line::from(m.as_str()))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
