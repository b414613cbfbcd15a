//! Board grid rendering.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::animation::AnimationPhase;
use crate::board::{Annotation, TileState};
use crate::constants::EMPTY_ENTITY_ID;
use crate::game::GameSession;

/// Render the dungeon grid.
pub fn render_board(frame: &mut Frame, area: Rect, session: &GameSession, cursor: (usize, usize)) {
    let block = Block::default()
        .title(" MindSweeper ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Each cell is 2 chars wide, 1 char tall; center the grid
    let grid_width = (session.cols() * 2) as u16;
    let grid_height = session.rows() as u16;
    let x_offset = inner.x + (inner.width.saturating_sub(grid_width)) / 2;
    let y_offset = inner.y + (inner.height.saturating_sub(grid_height)) / 2;

    let game_over = session.game_over().is_some();

    for row in 0..session.rows() {
        let mut spans = Vec::new();

        for col in 0..session.cols() {
            let (text, mut style) = cell_display(session, row, col);

            if cursor == (row, col) && !game_over {
                style = style.bg(Color::DarkGray);
            }

            spans.push(Span::styled(text, style));
        }

        let line = Paragraph::new(Line::from(spans));
        frame.render_widget(
            line,
            Rect::new(x_offset, y_offset + row as u16, grid_width, 1),
        );
    }
}

/// Display text and style for one tile.
fn cell_display(session: &GameSession, row: usize, col: usize) -> (String, Style) {
    // An active animation overrides the resting look of the tile
    if let Some(phase) = session.animation_phase(row, col) {
        return animation_display(phase);
    }

    if session.tile_state(row, col) == TileState::Hidden {
        return hidden_display(session.annotation(row, col));
    }

    let entity_id = session.entity_id(row, col);
    if entity_id == EMPTY_ENTITY_ID {
        return threat_display(session.threat_level(row, col));
    }

    entity_display(session, row, col, entity_id)
}

fn hidden_display(annotation: Option<Annotation>) -> (String, Style) {
    match annotation {
        Some(Annotation::Level(n)) => (
            format!("{n:<2}"),
            Style::default().fg(Color::LightBlue),
        ),
        Some(Annotation::Danger) => ("* ".to_string(), Style::default().fg(Color::Red)),
        Some(Annotation::Friendly) => ("F ".to_string(), Style::default().fg(Color::Green)),
        None => ("# ".to_string(), Style::default().fg(Color::Gray)),
    }
}

fn animation_display(phase: AnimationPhase) -> (String, Style) {
    match phase {
        AnimationPhase::Revealing => (". ".to_string(), Style::default().fg(Color::DarkGray)),
        AnimationPhase::Combat => (
            "/ ".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        AnimationPhase::CombatStage2 => (
            "X ".to_string(),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ),
        AnimationPhase::Dying => ("x ".to_string(), Style::default().fg(Color::DarkGray)),
        AnimationPhase::TreasureClaim => (
            "$ ".to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        AnimationPhase::EntityTransition => (
            "~ ".to_string(),
            Style::default().fg(Color::Magenta),
        ),
    }
}

/// Threat numbers, color-graded like the classic hint colors but scaled for
/// level sums rather than neighbor counts.
fn threat_display(threat: u32) -> (String, Style) {
    if threat == 0 {
        return (". ".to_string(), Style::default().fg(Color::DarkGray));
    }

    let color = match threat {
        1..=2 => Color::Blue,
        3..=4 => Color::Green,
        5..=6 => Color::Yellow,
        7..=9 => Color::Red,
        _ => Color::Magenta,
    };
    (format!("{threat:<2}"), Style::default().fg(color))
}

fn entity_display(
    session: &GameSession,
    row: usize,
    col: usize,
    entity_id: u32,
) -> (String, Style) {
    let Some(def) = session.definition(entity_id) else {
        return ("? ".to_string(), Style::default().fg(Color::White));
    };

    // Last word carries the identity ("Cave Rat" -> r, "Cave Bat" -> b)
    let glyph = def
        .name
        .split_whitespace()
        .last()
        .and_then(|word| word.chars().find(|c| c.is_ascii_alphabetic()))
        .unwrap_or('?');

    if session.is_dead(row, col) {
        // Defeated occupant awaiting (or denied) its transition
        return (
            format!("{} ", glyph.to_ascii_lowercase()),
            Style::default().fg(Color::DarkGray),
        );
    }

    if def.is_enemy() {
        let style = if def.level >= 6 {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::LightRed)
        };
        return (format!("{} ", glyph.to_ascii_lowercase()), style);
    }

    if def.is_item() {
        return (
            format!("{} ", glyph.to_ascii_uppercase()),
            Style::default().fg(Color::Cyan),
        );
    }

    // Neutral obstacles
    (
        format!("{} ", glyph.to_ascii_uppercase()),
        Style::default().fg(Color::Gray),
    )
}
