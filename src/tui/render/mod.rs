pub mod calendar_view;
pub mod canvas_view;
pub mod confirm_popup;
pub mod help_overlay;
pub mod status_row;
pub mod tab_bar;
pub mod timeline_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;
use unicode_segmentation::UnicodeSegmentation;

use super::app::{App, LayoutAreas, View};
use crate::util::unicode::display_width;

/// Main render function, dispatches to sub-renderers and records where
/// each region landed for pointer hit-testing
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    let content = chunks[1];
    app.areas = LayoutAreas {
        content,
        ..LayoutAreas::default()
    };
    match app.view {
        View::Map => {
            let canvas_rows = (u32::from(content.height) * u32::from(app.split_percent) / 100) as u16;
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(canvas_rows),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .split(content);
            app.areas.canvas = Some(split[0]);
            app.areas.splitter = Some(split[1]);
            app.areas.timeline = Some(split[2]);
            canvas_view::render_canvas_view(frame, app, crate::model::SpatialView::Map, split[0]);
            render_splitter(frame, app, split[1]);
            timeline_view::render_timeline_view(frame, app, split[2]);
        }
        View::Goals => {
            app.areas.canvas = Some(content);
            canvas_view::render_canvas_view(frame, app, crate::model::SpatialView::Vision, content);
        }
        View::Calendar => {
            app.areas.calendar = Some(content);
            calendar_view::render_calendar_view(frame, app, content);
        }
    }

    if app.confirm.is_some() {
        confirm_popup::render_confirm_popup(frame, app, frame.area());
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

fn render_splitter(frame: &mut Frame, app: &App, area: Rect) {
    let style = Style::default().fg(app.theme.dim).bg(app.theme.background);
    let line = "\u{2550}".repeat(usize::from(area.width));
    put_clipped(frame.buffer_mut(), area, 0, 0, &line, usize::from(area.width), style);
}

/// Write `text` at a position relative to `area`, dropping every grapheme
/// that falls outside it. Writes at most `max_cells` cells.
pub(super) fn put_clipped(
    buf: &mut Buffer,
    area: Rect,
    col: i64,
    row: i64,
    text: &str,
    max_cells: usize,
    style: Style,
) {
    if row < 0 || row >= i64::from(area.height) {
        return;
    }
    let y = area.y + row as u16;
    let mut c = col;
    let mut used = 0usize;
    for g in text.graphemes(true) {
        let w = display_width(g);
        if used + w > max_cells || c + w as i64 > i64::from(area.width) {
            break;
        }
        if c >= 0 {
            buf.set_string(area.x + c as u16, y, g, style);
        }
        c += w as i64;
        used += w;
    }
}

/// Blank `width` cells starting at a position relative to `area`
pub(super) fn fill_clipped(buf: &mut Buffer, area: Rect, col: i64, row: i64, width: usize, style: Style) {
    if row < 0 || row >= i64::from(area.height) {
        return;
    }
    let start = col.max(0);
    let end = (col + width as i64).min(i64::from(area.width));
    if end <= start {
        return;
    }
    let blank = " ".repeat((end - start) as usize);
    buf.set_string(area.x + start as u16, area.y + row as u16, blank, style);
}

/// Create a centered rectangle of the given percentage of the parent
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A centered rectangle of fixed size, shrunk to fit the parent
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
