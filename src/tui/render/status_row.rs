use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::tui::gesture::Gesture;
use crate::util::unicode::display_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = usize::from(area.width);

    let (mut spans, hint) = match app.mode {
        Mode::Navigate => navigate_spans(app),
        Mode::Edit => {
            let mut spans = Vec::new();
            if let Some(edit) = &app.edit {
                let (before, after) = edit.buffer.split_at(edit.cursor.min(edit.buffer.len()));
                spans.push(Span::styled(
                    format!("{}: ", edit.target.prompt()),
                    Style::default().fg(app.theme.dim).bg(bg),
                ));
                spans.push(Span::styled(
                    before.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ));
                spans.push(Span::styled(
                    "\u{258C}",
                    Style::default().fg(app.theme.highlight).bg(bg),
                )); // ▌ cursor
                spans.push(Span::styled(
                    after.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ));
            }
            (spans, "Enter save  Esc cancel")
        }
        Mode::Confirm => {
            let message = app
                .confirm
                .as_ref()
                .map(|c| c.message.clone())
                .unwrap_or_default();
            (
                vec![Span::styled(
                    message,
                    Style::default().fg(app.theme.text_bright).bg(bg),
                )],
                "y confirm  n cancel",
            )
        }
    };

    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn navigate_spans(app: &App) -> (Vec<Span<'static>>, &'static str) {
    let bg = app.theme.background;
    let hint = match &app.gesture {
        Gesture::LinkingSpatial { .. } | Gesture::LinkingTimeline { .. } => "release on a note to link",
        Gesture::Idle => "? help",
        _ => "",
    };
    let spans = match &app.status_message {
        Some(message) => vec![Span::styled(
            message.clone(),
            Style::default().fg(app.theme.text).bg(bg),
        )],
        None => Vec::new(),
    };
    (spans, hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteId;
    use crate::tui::app::EditTarget;
    use crate::tui::render::test_helpers::*;

    fn status(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn navigate_shows_notice_and_help_hint() {
        let mut app = app_with_notes(vec![]);
        app.notice("saved planboard.json");
        let output = status(&app);
        assert!(output.starts_with("saved planboard.json"));
        assert!(output.ends_with("? help"));
    }

    #[test]
    fn edit_shows_prompt_and_cursor() {
        let mut app = app_with_notes(vec![note("1", "Kiln")]);
        app.begin_edit(EditTarget::Title(NoteId::from("1")), "Kiln");
        if let Some(edit) = app.edit.as_mut() {
            edit.cursor = 2;
        }
        let output = status(&app);
        assert!(output.starts_with("title: Ki\u{258C}ln"));
        assert!(output.contains("Esc cancel"));
    }

    #[test]
    fn linking_gesture_hint() {
        let mut app = app_with_notes(vec![note("1", "Kiln")]);
        app.gesture = Gesture::LinkingTimeline {
            from: NoteId::from("1"),
        };
        assert!(status(&app).contains("release on a note to link"));
    }
}
