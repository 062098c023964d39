use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, View};
use crate::util::date::format_date;
use crate::util::unicode::display_width;

/// Render the tab bar: view tabs and the reference date, with separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans: Vec<Span> = vec![
        Span::styled(" ", bg_style),
        Span::styled("\u{25B6}", Style::default().fg(app.theme.purple).bg(bg)),
        Span::styled(" ", bg_style),
    ];
    let mut sep_cols: Vec<usize> = Vec::new();

    for (i, view) in View::ALL.into_iter().enumerate() {
        let style = tab_style(app, app.view == view);
        spans.push(Span::styled(format!(" {} {} ", i + 1, view.label()), style));
        sep_cols.push(spans.iter().map(|s| display_width(&s.content)).sum());
        spans.push(sep.clone());
    }

    // Right side: unsaved marker and the date the views are anchored on
    let mut right: Vec<Span> = Vec::new();
    if app.dirty {
        right.push(Span::styled(
            "\u{25CF} ",
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }
    let date_style = if app.reference_pinned {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };
    right.push(Span::styled(format_date(app.reference), date_style));
    right.push(Span::styled(" ", bg_style));

    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let right_width: usize = right.iter().map(|s| display_width(&s.content)).sum();
    let width = usize::from(area.width);
    if used + right_width < width {
        spans.push(Span::styled(" ".repeat(width - used - right_width), bg_style));
        spans.extend(right);
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = usize::from(area.width);
    let mut line = String::with_capacity(width * 3);
    for col in 0..width {
        if sep_cols.contains(&col) {
            line.push('\u{2534}');
        } else {
            line.push('\u{2500}');
        }
    }
    let sep_widget =
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
