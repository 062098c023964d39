use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::app::{App, ConfirmAction};
use crate::util::unicode::display_width;

use super::centered_rect_fixed;

/// Render the yes/no popup for a pending confirmation
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(confirm) = &app.confirm else {
        return;
    };
    let popup_w: u16 = 48.min(area.width.saturating_sub(2));
    let inner_w = usize::from(popup_w.saturating_sub(2)).max(1);

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let header = match confirm.action {
        ConfirmAction::DeleteNote(_) => " Delete",
        ConfirmAction::AcknowledgeEvent { .. } => " Event",
    };

    let mut lines = vec![
        Line::from(Span::styled(header, header_style)),
        Line::from(""),
        Line::from(Span::styled(format!(" {}", confirm.message), text_style)),
        Line::from(""),
        Line::from(vec![
            Span::styled(" y", key_style),
            Span::styled(" yes   ", dim_style),
            Span::styled("n", key_style),
            Span::styled(" no", dim_style),
        ]),
    ];
    if let ConfirmAction::AcknowledgeEvent { title } = &confirm.action
        && let Some(details) = event_details(app, title)
    {
        lines.insert(3, Line::from(Span::styled(format!(" {}", details), dim_style)));
    }

    // Wrapped message height, plus borders
    let message_rows = display_width(&confirm.message).div_ceil(inner_w) as u16;
    let popup_h = (lines.len() as u16 + message_rows.saturating_sub(1) + 2)
        .min(area.height.saturating_sub(2));

    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn event_details(app: &App, title: &str) -> Option<String> {
    app.events
        .iter()
        .find(|e| e.title == title)
        .map(|e| e.extended_props.details.clone())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventProps, ExternalEvent, NoteId};
    use crate::tui::render::test_helpers::*;

    #[test]
    fn delete_confirmation_shows_message_and_keys() {
        let mut app = app_with_notes(vec![note("1", "Kiln")]);
        app.begin_confirm(
            "delete \"Kiln\"?".into(),
            ConfirmAction::DeleteNote(NoteId::from("1")),
        );
        let output = render_app(&mut app, TERM_W, TERM_H);
        assert!(output.contains("Delete"));
        assert!(output.contains("delete \"Kiln\"?"));
        assert!(output.contains("y yes"));
    }

    #[test]
    fn event_confirmation_shows_details() {
        let mut app = app_with_notes(vec![]);
        app.events = vec![ExternalEvent {
            title: "Clay".into(),
            start: "2026-01-12".into(),
            extended_props: EventProps {
                confidence: "high".into(),
                details: "40 kg".into(),
            },
        }];
        app.begin_confirm(
            "Clay: request stock update?".into(),
            ConfirmAction::AcknowledgeEvent {
                title: "Clay".into(),
            },
        );
        let output = render_app(&mut app, TERM_W, TERM_H);
        assert!(output.contains("Clay: request stock update?"));
        assert!(output.contains("40 kg"));
    }
}
