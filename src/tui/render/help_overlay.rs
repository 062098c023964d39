use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, View};

use super::centered_rect;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(70, 90, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    // Context-sensitive help
    match app.view {
        View::Map | View::Goals => {
            lines.push(Line::from(Span::styled(" Canvas", header_style)));
            add_binding(&mut lines, " dbl-click", "New note / edit title", key_style, desc_style);
            add_binding(&mut lines, " drag", "Move note / pan empty space", key_style, desc_style);
            add_binding(&mut lines, " drag +", "Link to another note", key_style, desc_style);
            add_binding(&mut lines, " click \u{2610}", "Toggle complete", key_style, desc_style);
            add_binding(&mut lines, " wheel +/-", "Zoom", key_style, desc_style);
            add_binding(&mut lines, " \u{2190}\u{2191}\u{2192}\u{2193}", "Pan", key_style, desc_style);
            if app.view == View::Map {
                add_binding(&mut lines, " drag bar", "Move dates / resize at \u{2503}", key_style, desc_style);
                add_binding(&mut lines, " [ ]", "Narrower / wider days", key_style, desc_style);
                add_binding(&mut lines, " g", "Goals on timeline", key_style, desc_style);
                add_binding(&mut lines, " PgUp/PgDn", "Scroll timeline", key_style, desc_style);
            }
            lines.push(Line::from(""));
        }
        View::Calendar => {
            lines.push(Line::from(Span::styled(" Calendar", header_style)));
            add_binding(&mut lines, " < >", "Previous / next month", key_style, desc_style);
            add_binding(&mut lines, " T", "Back to today", key_style, desc_style);
            add_binding(&mut lines, " y / o", "Edit year / month goal", key_style, desc_style);
            add_binding(&mut lines, " click slot", "Edit goal slot", key_style, desc_style);
            lines.push(Line::from(""));
        }
    }

    lines.push(Line::from(Span::styled(" Selected note", header_style)));
    add_binding(&mut lines, " j/k Esc", "Select next / prev / none", key_style, desc_style);
    add_binding(&mut lines, " e M", "Edit title / memo", key_style, desc_style);
    add_binding(&mut lines, " d D", "Edit start / end date", key_style, desc_style);
    add_binding(&mut lines, " m i t", "Cycle member / icon / timeframe", key_style, desc_style);
    add_binding(&mut lines, " b c x", "Bottleneck / workshop / done", key_style, desc_style);
    add_binding(&mut lines, " Del", "Delete", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, " 1 2 3 Tab", "Map / Goals / Calendar", key_style, desc_style);
    add_binding(&mut lines, " a", "Arrange board", key_style, desc_style);
    add_binding(&mut lines, " s r A", "Save / reload / merge file", key_style, desc_style);
    add_binding(&mut lines, " ?", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 14;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn help_is_view_specific() {
        let mut app = app_with_notes(vec![]);
        app.show_help = true;
        let output = render_app(&mut app, 100, 40);
        assert!(output.contains("Key Bindings"));
        assert!(output.contains("Scroll timeline"));

        app.view = View::Calendar;
        let output = render_app(&mut app, 100, 40);
        assert!(output.contains("Previous / next month"));
        assert!(!output.contains("Scroll timeline"));
    }
}
