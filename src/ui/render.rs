//! UI renderer implementation.
//!
//! Contains the top-level `render` entry point used by the terminal loop and the layout helper
//! that splits the screen into header, listing and footer.
//!
//! This module stays "pure rendering": it reads state and config and produces widgets, without
//! owning any filebeam core logic.

use crate::app::AppState;
use crate::core::{
    CALCULATING, Entry, EntryKind, capacity_of, device_of, format_entry_size,
    format_file_size, format_file_time, format_usage, sanitize_to_exact_width,
};
use crate::ui::widgets;
use crate::utils::shorten_home_path;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

const MARKER_WIDTH: usize = 2;
const USAGE_WIDTH: usize = 7;
const TIME_WIDTH: usize = 17;
const DENIED_TEXT: &str = "Permission denied - cannot access directory";

/// Renders the entire terminal UI for filebeam on each frame.
pub fn render(frame: &mut Frame, app: &AppState) {
    let chunks = layout_chunks(frame.area());

    render_header(frame, app, chunks[0]);
    render_listing(frame, app, chunks[1]);
    widgets::draw_footer(frame, app, chunks[2]);
    widgets::draw_dialogs(frame, app);
}

/// Returns the header, listing and footer areas for `area`.
pub fn layout_chunks(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area)
        .to_vec()
}

/// Current directory on the left; its device and capacity on the right.
fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let current = app.nav().current_dir();
    let path_str = shorten_home_path(current);

    let device = device_of(current);
    let capacity = capacity_of(&device);
    let device_str = if capacity > 0 {
        format!("{} ({}) ", device, format_file_size(capacity))
    } else {
        format!("{} ", device)
    };

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(device_str.chars().count() as u16),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            path_str,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))),
        header[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            device_str,
            Style::default().fg(Color::DarkGray),
        ))),
        header[1],
    );
}

/// Column widths of one listing row.
struct Columns {
    name: usize,
    size: usize,
    usage: usize,
    time: usize,
}

impl Columns {
    fn for_width(app: &AppState, width: usize) -> Self {
        let display = app.config().display();
        let size = CALCULATING.chars().count() + 1;
        let usage = if display.usage_column() { USAGE_WIDTH } else { 0 };
        let time = if display.modified_column() {
            TIME_WIDTH
        } else {
            0
        };
        Self {
            name: width.saturating_sub(MARKER_WIDTH + size + usage + time),
            size,
            usage,
            time,
        }
    }
}

fn render_listing(frame: &mut Frame, app: &AppState, area: Rect) {
    let nav = app.nav();

    if nav.is_denied() {
        let line = Line::from(Span::styled(
            DENIED_TEXT,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    if nav.entries().is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("[Empty]", Style::default().fg(Color::DarkGray))),
            area,
        );
        return;
    }

    let columns = Columns::for_width(app, area.width as usize);
    let items: Vec<ListItem> = nav
        .entries()
        .iter()
        .map(|entry| make_entry_row(app, entry, &columns))
        .collect();

    let mut state = ListState::default();
    state.select(Some(nav.focus_idx()));

    frame.render_stateful_widget(
        List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .scroll_padding(2),
        area,
        &mut state,
    );
}

fn make_entry_row<'a>(app: &AppState, entry: &Entry, columns: &Columns) -> ListItem<'a> {
    let selected = app.selection().contains(entry.path());
    let marker = if selected { "* " } else { "  " };

    let mut name = entry.name_str().into_owned();
    if entry.is_dir() && !entry.is_parent() {
        name.push('/');
    }
    if entry.is_symlink() {
        name.push_str(" -> ");
        name.push_str(&entry.real_path().to_string_lossy());
    }

    let name_style = match entry.kind() {
        EntryKind::Directory | EntryKind::Parent => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        EntryKind::File if entry.is_symlink() => Style::default().fg(Color::Magenta),
        EntryKind::File => Style::default(),
    };

    let size_text = format_entry_size(entry);
    let size_style = if entry.size_known() {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(sanitize_to_exact_width(&name, columns.name), name_style),
        Span::styled(
            format!("{:>width$}", size_text, width = columns.size),
            size_style,
        ),
    ];

    if columns.usage > 0 {
        let usage = format_usage(entry, capacity_of(entry.device()));
        spans.push(Span::styled(
            format!("{:>width$}", usage, width = columns.usage),
            Style::default().fg(Color::Green),
        ));
    }

    if columns.time > 0 {
        let time = if entry.is_parent() {
            String::new()
        } else {
            format_file_time(entry.modified())
        };
        spans.push(Span::styled(
            format!("{:>width$}", time, width = columns.time),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(Line::from(spans))
}
