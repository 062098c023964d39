use chrono::Datelike;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::projection::timeline::{Bar, DayColumn};
use crate::tui::app::App;
use crate::util::date::month_day_label;
use crate::util::unicode::fit_to_width;

use super::{fill_clipped, put_clipped};

/// Rows taken by the day header above the first bar
pub const HEADER_ROWS: u16 = 1;

const LINK_HANDLE: &str = "\u{25cb}";
const LINK_HANDLE_ACTIVE: &str = "\u{25cf}";
const RESIZE_HANDLE: &str = "\u{2503}";

/// Render the timeline: a day header, then one row per dated note
pub fn render_timeline_view(frame: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let scene = &app.scenes.timeline;
    let label_width = usize::from(scene.options.label_width);
    let bg = app.theme.background;
    let buf = frame.buffer_mut();

    put_clipped(
        buf,
        area,
        0,
        0,
        &fit_to_width(" Timeline", label_width),
        label_width,
        Style::default().fg(app.theme.dim).bg(bg),
    );
    for column in &scene.header {
        render_day_label(buf, app, area, column);
    }

    let visible = usize::from(area.height.saturating_sub(HEADER_ROWS));
    if scene.bars.is_empty() {
        put_clipped(
            buf,
            area,
            1,
            i64::from(HEADER_ROWS),
            "no dated notes",
            label_width.max(14),
            Style::default().fg(app.theme.dim).bg(bg),
        );
        return;
    }

    for (offset, bar) in scene
        .bars
        .iter()
        .skip(app.timeline_scroll)
        .take(visible)
        .enumerate()
    {
        let row = i64::from(HEADER_ROWS) + offset as i64;
        render_bar_row(buf, app, area, row, bar);
    }

    let hidden = scene.bars.len().saturating_sub(app.timeline_scroll + visible);
    if hidden > 0 {
        let text = format!("\u{2193}{}", hidden);
        put_clipped(
            buf,
            area,
            i64::from(area.width) - text.chars().count() as i64,
            i64::from(area.height) - 1,
            &text,
            8,
            Style::default().fg(app.theme.dim).bg(bg),
        );
    }
}

fn render_day_label(buf: &mut ratatui::buffer::Buffer, app: &App, area: Rect, column: &DayColumn) {
    let width = usize::from(app.scenes.timeline.options.day_width);
    let label = if width >= 5 {
        month_day_label(column.date)
    } else {
        column.date.day().to_string()
    };
    let mut style = if column.is_weekend() {
        Style::default().fg(app.theme.weekend).bg(app.theme.background)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    };
    if column.is_reference {
        style = style
            .fg(app.theme.highlight)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD);
    }
    put_clipped(buf, area, column.left, 0, &fit_to_width(&label, width), width, style);
}

fn render_bar_row(buf: &mut ratatui::buffer::Buffer, app: &App, area: Rect, row: i64, bar: &Bar) {
    let theme = &app.theme;
    let label_width = i64::from(app.scenes.timeline.options.label_width);
    let member = theme.member_color(bar.member);

    let mut label_style = Style::default().fg(member).bg(theme.background);
    if bar.selected {
        label_style = label_style.bg(theme.selection_bg).add_modifier(Modifier::BOLD);
    }
    let zone = if bar.workshop { "\u{2692}" } else { " " };
    let label = format!("{}{} {}", zone, bar.icon, bar.title);
    let gutter = label_width.saturating_sub(1).max(0) as usize;
    put_clipped(buf, area, 0, row, &fit_to_width(&label, gutter), gutter, label_style);

    let first = bar.left.max(label_width);
    let last = bar.left + bar.width - 1;
    if last < first {
        return;
    }

    let mut body = Style::default().fg(theme.background).bg(member);
    if bar.complete {
        body = body.bg(theme.dim).add_modifier(Modifier::CROSSED_OUT);
    }
    if bar.selected {
        body = body.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    let span_width = (last - first + 1) as usize;
    fill_clipped(buf, area, first, row, span_width, body);

    // Title inside the body, between the handles
    let inner_start = (bar.left + 1).max(first);
    let inner_width = (last - inner_start).max(0) as usize;
    put_clipped(buf, area, inner_start, row, &bar.title, inner_width, body);

    if bar.left >= label_width {
        let linking = app.gesture.link_source() == Some(&bar.id);
        let handle = if linking { LINK_HANDLE_ACTIVE } else { LINK_HANDLE };
        put_clipped(buf, area, bar.left, row, handle, 1, body);
    }
    if bar.width > 1 {
        put_clipped(buf, area, last, row, RESIZE_HANDLE, 1, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn dated(id: &str, title: &str, start: &str, end: &str) -> crate::model::Note {
        let mut n = note(id, title);
        n.start = Some(date(start));
        n.end = Some(date(end));
        n
    }

    #[test]
    fn renders_header_and_bar_labels() {
        let mut app = app_with_notes(vec![dated("1", "Glaze", "2026-01-10", "2026-01-12")]);
        let output = render_app(&mut app, TERM_W, TERM_H);
        assert!(output.contains("Timeline"));
        assert!(output.contains("Glaze"));
        // Day numbers around the reference date
        assert!(output.contains("10"));
        assert!(output.contains("11"));
    }

    #[test]
    fn empty_timeline_says_so() {
        let mut app = app_with_notes(vec![]);
        let output = render_app(&mut app, TERM_W, TERM_H);
        assert!(output.contains("no dated notes"));
    }

    #[test]
    fn scroll_hides_earlier_rows() {
        let mut first = dated("1", "First", "2026-01-10", "2026-01-10");
        // Keep the card off the canvas
        first.x = -5000.0;
        let notes = vec![first, dated("2", "Second", "2026-01-11", "2026-01-11")];
        let mut app = app_with_notes(notes);
        app.timeline_scroll = 1;
        let output = render_app(&mut app, TERM_W, TERM_H);
        assert!(!output.contains("First"));
        assert!(output.contains("Second"));
    }

    #[test]
    fn bar_body_starts_at_its_day_column() {
        let mut app = app_with_notes(vec![dated("1", "Fire", "2026-01-10", "2026-01-13")]);
        render_app(&mut app, TERM_W, TERM_H);
        let timeline = app.areas.timeline.unwrap();
        let bar = app.scenes.timeline.bars[0].clone();
        // label 20 + 7 lead days * 4 cells
        assert_eq!(bar.left, 48);
        assert_eq!(bar.width, 16);
        let hit = app.scenes.timeline.hit(0, bar.left);
        assert!(matches!(hit, Some((_, crate::projection::BarPart::LinkHandle))));
        assert!(HEADER_ROWS < timeline.height);
    }
}
