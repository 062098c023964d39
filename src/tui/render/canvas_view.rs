use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};

use crate::model::{SpatialView, Timeframe, Transform};
use crate::projection::spatial::{Card, CardStyle, Connector};
use crate::projection::{CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::tui::app::App;
use crate::util::date::month_day_label;
use crate::util::unicode::display_width;

use super::{fill_clipped, put_clipped};

const LINK_HANDLE: &str = "+";
const LINK_HANDLE_ACTIVE: &str = "\u{25cf}";
const UNCHECKED: &str = "\u{2610}";
const CHECKED: &str = "\u{2611}";

/// Render one spatial canvas: connectors underneath, cards on top
pub fn render_canvas_view(frame: &mut Frame, app: &App, view: SpatialView, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let scene = app.scenes.spatial(view);

    if !scene.connectors.is_empty() {
        render_connectors(frame, app, &scene.connectors, &scene.transform, area);
    }

    let link_source = app.gesture.link_source();
    let buf = frame.buffer_mut();
    for card in &scene.cards {
        let linking = link_source == Some(&card.id);
        render_card(buf, app, area, card, &scene.transform, linking);
    }

    if scene.cards.is_empty() {
        let hint = match view {
            SpatialView::Map => "double-click to add a note",
            SpatialView::Vision => "double-click to add a goal",
        };
        let col = (i64::from(area.width) - display_width(hint) as i64) / 2;
        put_clipped(
            buf,
            area,
            col.max(0),
            i64::from(area.height / 2),
            hint,
            display_width(hint),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        );
    }
}

/// Model point to fractional canvas cells, y growing downward
fn to_cells(transform: &Transform, x: f64, y: f64) -> (f64, f64) {
    let (sx, sy) = transform.model_to_screen(x, y);
    (sx / CELL_WIDTH_PX, sy / CELL_HEIGHT_PX)
}

fn render_connectors(frame: &mut Frame, app: &App, connectors: &[Connector], transform: &Transform, area: Rect) {
    let width = f64::from(area.width);
    let height = f64::from(area.height);
    // Heavy strokes when zoomed far out
    let marker = if connectors.iter().any(|c| c.stroke_width > 4.0) {
        Marker::HalfBlock
    } else {
        Marker::Braille
    };
    let color = app.theme.connector;
    let lines: Vec<CanvasLine> = connectors
        .iter()
        .map(|c| {
            let (x1, y1) = to_cells(transform, c.x1, c.y1);
            let (x2, y2) = to_cells(transform, c.x2, c.y2);
            CanvasLine {
                x1,
                y1: height - y1,
                x2,
                y2: height - y2,
                color,
            }
        })
        .collect();

    let canvas = Canvas::default()
        .background_color(app.theme.background)
        .marker(marker)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            for line in &lines {
                ctx.draw(line);
            }
        });
    frame.render_widget(canvas, area);
}

fn style_tag(style: CardStyle) -> Option<&'static str> {
    match style {
        CardStyle::Bottleneck => Some(" ! "),
        CardStyle::Goal(Timeframe::Year) => Some(" year "),
        CardStyle::Goal(Timeframe::Month) => Some(" month "),
        CardStyle::Goal(Timeframe::Week) => Some(" week "),
        CardStyle::Plain => None,
    }
}

fn date_line(card: &Card) -> Option<String> {
    let start = card.start?;
    match card.end {
        Some(end) if end != start => Some(format!("{}-{}", month_day_label(start), month_day_label(end))),
        _ => Some(month_day_label(start)),
    }
}

fn render_card(buf: &mut Buffer, app: &App, area: Rect, card: &Card, transform: &Transform, linking: bool) {
    let theme = &app.theme;
    let rect = card.cell_rect(transform);
    let (x, y) = (i64::from(rect.x), i64::from(rect.y));
    let (w, h) = (i64::from(rect.width), i64::from(rect.height));

    let bg = if card.selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let fill = Style::default().bg(bg);
    for row in y..y + h {
        fill_clipped(buf, area, x, row, w as usize, fill);
    }

    let mut title_style = Style::default().fg(theme.member_color(card.member)).bg(bg);
    if card.complete {
        title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
    }
    if card.selected {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }

    if !rect.has_handles() {
        let text = format!("{} {}", card.icon, card.title);
        put_clipped(buf, area, x, y, &text, w as usize, title_style);
        return;
    }

    let border = Style::default()
        .fg(theme.card_border(card.style, card.selected))
        .bg(bg);
    let inner = (w - 2) as usize;
    let horizontal = "\u{2500}".repeat(inner);
    put_clipped(buf, area, x, y, &format!("\u{250c}{}\u{2510}", horizontal), w as usize, border);
    put_clipped(buf, area, x, y + h - 1, &format!("\u{2514}{}\u{2518}", horizontal), w as usize, border);
    for row in y + 1..y + h - 1 {
        put_clipped(buf, area, x, row, "\u{2502}", 1, border);
        put_clipped(buf, area, x + w - 1, row, "\u{2502}", 1, border);
    }
    if let Some(tag) = style_tag(card.style) {
        put_clipped(buf, area, x + 2, y, tag, inner.saturating_sub(2), border.add_modifier(Modifier::BOLD));
    }

    let (hx, hy) = rect.link_handle();
    let handle_style = Style::default().fg(theme.highlight).bg(bg);
    let handle = if linking { LINK_HANDLE_ACTIVE } else { LINK_HANDLE };
    put_clipped(buf, area, i64::from(hx), i64::from(hy), handle, 1, handle_style);

    let (cx, cy) = rect.complete_toggle();
    let check = if card.complete { CHECKED } else { UNCHECKED };
    let check_style = Style::default()
        .fg(if card.complete { theme.green } else { theme.text })
        .bg(bg);
    put_clipped(buf, area, i64::from(cx), i64::from(cy), check, 1, check_style);

    // Title after the two handles
    let title_col = i64::from(cx) + 2;
    let title_width = (x + w - 1 - title_col).max(0) as usize;
    let title = format!("{} {}", card.icon, card.title);
    put_clipped(buf, area, title_col, y + 1, &title, title_width, title_style);

    let detail = Style::default().fg(theme.dim).bg(bg);
    let mut row = y + 2;
    if row < y + h - 1 {
        put_clipped(buf, area, x + 1, row, card.member.label(), inner, detail);
        row += 1;
    }
    if row < y + h - 1
        && let Some(dates) = date_line(card)
    {
        put_clipped(buf, area, x + 1, row, &dates, inner, detail);
    }
}
