//! Footer line and modal dialogs for filebeam.
//!
//! Dialogs are drawn on top of the listing while the [ActionMode] is not `Browsing`.

use crate::app::{ActionMode, AppState, NoticeKind, PromptKind};
use crate::core::format_item_count;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use std::path::{Path, PathBuf};

/// Draws the footer: selection count, outstanding work and the current notice on the left,
/// position in the listing on the right.
pub fn draw_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let mut parts = Vec::new();

    let selected = app.selection().len();
    if selected > 0 {
        parts.push(Span::styled(
            format!("{} selected", selected),
            Style::default().fg(Color::Yellow),
        ));
    }

    let calculating = app.sizes().outstanding();
    if calculating > 0 {
        parts.push(Span::styled(
            format!("sizing {}", calculating),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let pending = app.pending_ops();
    if pending > 0 {
        parts.push(Span::styled(
            format!("{} running", pending),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(notice) = app.notice() {
        let style = match notice.kind() {
            NoticeKind::Info => Style::default().fg(Color::Green),
            NoticeKind::Error => Style::default().fg(Color::Red),
        };
        parts.push(Span::styled(notice.text().to_string(), style));
    }

    let mut spans = Vec::with_capacity(parts.len() * 2);
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        spans.push(part);
    }

    let total = app.nav().entries().len();
    let position = if total == 0 {
        "0/0".to_string()
    } else {
        format!("{}/{}", app.nav().focus_idx() + 1, total)
    };

    let footer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(position.len() as u16 + 1),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(spans)), footer[0]);
    frame.render_widget(
        Paragraph::new(position).alignment(Alignment::Right),
        footer[1],
    );
}

/// Draws the open modal, if any.
pub fn draw_dialogs(frame: &mut Frame, app: &AppState) {
    match app.actions().mode() {
        ActionMode::Browsing => {}
        ActionMode::ConfirmDelete { targets, use_trash } => {
            draw_confirm_dialog(frame, targets, *use_trash)
        }
        ActionMode::Prompt {
            kind,
            prompt,
            targets,
        } => draw_prompt_dialog(frame, app, *kind, prompt, targets),
    }
}

fn draw_confirm_dialog(frame: &mut Frame, targets: &[PathBuf], use_trash: bool) {
    let area = dialog_area(frame.area(), 60, listed_height(targets.len()));
    let visible_width = area.width.saturating_sub(2) as usize;

    let verb = if use_trash { "Trash" } else { "Delete" };
    let question = format!("{} {}? [y/N]", verb, format_item_count(targets.len()));

    let mut lines = vec![
        Line::raw(question),
        Line::from(Span::styled(
            "─".repeat(visible_width),
            Style::default().fg(Color::Red),
        )),
    ];
    lines.extend(target_lines(targets, area.height.saturating_sub(4) as usize));

    draw_dialog(
        frame,
        area,
        " Confirm Delete ",
        Style::default().fg(Color::Red),
        Text::from(lines),
    );
}

fn draw_prompt_dialog(
    frame: &mut Frame,
    app: &AppState,
    kind: PromptKind,
    prompt: &str,
    targets: &[PathBuf],
) {
    let show_targets = matches!(kind, PromptKind::Move | PromptKind::Copy);
    let height = if show_targets {
        listed_height(targets.len())
    } else {
        3
    };
    let area = dialog_area(frame.area(), 70, height);
    let visible_width = area.width.saturating_sub(2) as usize;

    let (display_input, cursor_offset) = input_field_view(
        app.actions().input_buffer(),
        app.actions().input_cursor_pos(),
        visible_width,
    );

    let accent = Style::default().fg(Color::Cyan);
    let mut lines = vec![Line::raw(display_input.to_string())];
    if show_targets {
        lines.push(Line::from(Span::styled("─".repeat(visible_width), accent)));
        lines.extend(target_lines(targets, area.height.saturating_sub(4) as usize));
    }

    draw_dialog(
        frame,
        area,
        &format!(" {} ", prompt),
        accent,
        Text::from(lines),
    );

    frame.set_cursor_position((area.x + 1 + cursor_offset as u16, area.y + 1));
}

fn draw_dialog(frame: &mut Frame, area: Rect, title: &str, border_style: Style, text: Text) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(title.to_string(), border_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Left),
        area,
    );
}

/// One line per target, shortened to `max` lines with a trailing count of the rest.
fn target_lines(targets: &[PathBuf], max: usize) -> Vec<Line<'static>> {
    let max = max.max(1);
    let mut lines: Vec<Line> = targets
        .iter()
        .take(if targets.len() > max { max - 1 } else { max })
        .map(|p| Line::raw(format!("  - {}", display_name(p))))
        .collect();

    if targets.len() > lines.len() {
        lines.push(Line::raw(format!(
            "  ... and {} more",
            targets.len() - lines.len()
        )));
    }
    lines
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Rows a dialog needs to list `count` targets below its two header lines.
fn listed_height(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX).saturating_add(4)
}

/// Centers a dialog of `width_pct` percent width and `height` rows in `area`.
fn dialog_area(area: Rect, width_pct: u16, height: u16) -> Rect {
    let height = height.min(area.height).min(area.height.saturating_sub(2).max(3));
    let width = (area.width as u32 * width_pct as u32 / 100) as u16;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

/// Part of `input_text` to show in a field `visible_width` columns wide, and the cursor column.
///
/// Scrolls so the end of the text stays visible once the text no longer fits.
fn input_field_view(input_text: &str, cursor_pos: usize, visible_width: usize) -> (&str, usize) {
    let cursor_pos = cursor_pos.min(input_text.len());
    if input_text.width() <= visible_width {
        return (input_text, input_text[..cursor_pos].width());
    }

    let mut current_w = 0;
    let mut start = 0;
    for (idx, ch) in input_text.char_indices().rev() {
        current_w += ch.width().unwrap_or(0);
        if current_w > visible_width {
            start = idx + ch.len_utf8();
            break;
        }
    }

    let cursor_offset = if cursor_pos < start {
        0
    } else {
        input_text[start..cursor_pos].width()
    };
    (&input_text[start..], cursor_offset)
}
