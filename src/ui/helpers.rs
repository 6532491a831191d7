use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Book;

/// Numbered listing line: `1. Title by Author (Year) - Genre - Read`.
pub(crate) fn book_line(position: usize, book: &Book) -> Line<'static> {
    let status_style = if book.read {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Yellow)
    };

    Line::from(vec![
        Span::styled(
            format!("{position}. {}", book.title),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" by {} ({}) - ", book.author, book.year)),
        Span::styled(
            book.genre.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        ),
        Span::raw(" - "),
        Span::styled(book.status_label(), status_style),
    ])
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Column `offset` cells into `area`, kept on the area's last column when the
/// text runs past the right edge.
pub(crate) fn cursor_column(area: Rect, offset: usize) -> u16 {
    let max_offset = area.width.saturating_sub(1);
    let offset = u16::try_from(offset).unwrap_or(u16::MAX).min(max_offset);
    area.x.saturating_add(offset)
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
