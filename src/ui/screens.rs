//! Full-screen info views and end-of-game popups.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::game::GameSession;

/// Entities roster grouped by disposition, with revealed/total counts for
/// the current board.
pub fn render_entities(frame: &mut Frame, area: Rect, session: &GameSession) {
    let block = Block::default()
        .title(" Entities ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    let categories: [(&str, Color, fn(&crate::entities::EntityDefinition) -> bool); 3] = [
        ("HOSTILE", Color::Red, |def| def.is_enemy()),
        ("FRIENDLY", Color::Green, |def| def.is_item()),
        ("NEUTRAL", Color::Cyan, |def| {
            !def.is_enemy() && !def.is_item() && def.id != 0
        }),
    ];

    for (title, color, matches) in categories {
        lines.push(Line::from(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));

        for def in session.catalog().definitions() {
            if !matches(def) {
                continue;
            }

            let (revealed, total) = session.entity_counts(def.id);
            if total == 0 {
                // Not on this map; still list it so the roster reads the same
                // across caves, but dimmed
                lines.push(Line::from(Span::styled(
                    format!("  L{:<2} {:<22} -", def.level, def.name),
                    Style::default().fg(Color::DarkGray),
                )));
            } else {
                lines.push(Line::from(Span::raw(format!(
                    "  L{:<2} {:<22} {revealed}/{total}",
                    def.level, def.name
                ))));
            }
        }

        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Press Esc to return",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Rules and key reference.
pub fn render_help(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" How to Play ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Style::default().fg(Color::Cyan);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("OBJECTIVE", header)),
        Line::from("  Defeat the Ancient Dragon. Level up before you try."),
        Line::from(""),
        Line::from(Span::styled("CLICKING TILES", header)),
        Line::from("  Hidden tiles reveal what they hide."),
        Line::from("  Numbers sum the levels of adjacent live hostiles."),
        Line::from("  Hostiles hit you for their level and grant that much XP."),
        Line::from("  Click revealed items again to claim them."),
        Line::from(""),
        Line::from(Span::styled("SPECIAL TILES", header)),
        Line::from("  Chests drop elixirs or experience caches."),
        Line::from("  Spyglasses survey a 3x3 patch; echoes reveal one tile."),
        Line::from("  Scrolls mark every rat or defuse every mine."),
        Line::from("  Monoliths just stand there. Leave them be."),
        Line::from(""),
        Line::from(Span::styled("KEYS", header)),
        Line::from("  arrows/hjkl move | enter/space click"),
        Line::from("  1-9 note a level, * danger, f friendly, c clear note"),
        Line::from("  u level up | n new cave | e entities | q quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc to return",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Defeat popup, centered on the board area.
pub fn render_game_over_popup(frame: &mut Frame, area: Rect, cause: &str) {
    let popup = centered_rect(area, 34, 6);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines = vec![
        Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Slain by {cause}")),
        Line::from(""),
        Line::from(Span::styled(
            "Press n for a new cave",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Victory popup, centered on the board area.
pub fn render_victory_popup(frame: &mut Frame, area: Rect, source: &str) {
    let popup = centered_rect(area, 38, 6);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines = vec![
        Line::from(Span::styled(
            "VICTORY",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{source} falls. The cave is yours.")),
        Line::from(""),
        Line::from(Span::styled(
            "Keep looting, or press n for a new cave",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
