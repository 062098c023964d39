use chrono::Datelike;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::projection::calendar::{CALENDAR_WEEKS, CalendarCell, GoalRef};
use crate::tui::app::App;
use crate::util::date::{is_weekend, month_day_label};
use crate::util::unicode::{fit_to_width, truncate_to_width};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Rows above the week grid: title, year slot, month slot, weekday header
const TOP_ROWS: u16 = 4;

const HIGH_CONFIDENCE_MARK: &str = "\u{2694}\u{fe0f} ";
const LOW_CONFIDENCE_MARK: &str = "\u{2753} ";

/// What sits under a cell of the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarHit {
    YearSlot,
    MonthSlot,
    WeekSlot(usize),
    /// `line` 0 is the date label; entries follow, then events
    Day { week: usize, day: usize, line: usize },
}

/// Cell geometry of the calendar grid, shared by rendering and hit-testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarLayout {
    pub title: Rect,
    pub year_slot: Rect,
    pub month_slot: Rect,
    pub header: Rect,
    pub week_slots: Vec<Rect>,
    /// `days[week][weekday]`, Sunday first
    pub days: Vec<Vec<Rect>>,
}

fn row_rect(area: Rect, offset: u16) -> Rect {
    if offset >= area.height {
        return Rect::new(area.x, area.y, area.width, 0);
    }
    Rect::new(area.x, area.y + offset, area.width, 1)
}

fn inside(r: Rect, col: u16, row: u16) -> bool {
    col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}

impl CalendarLayout {
    pub fn new(area: Rect) -> Self {
        let goal_width = (area.width / 8).max(8).min(area.width);
        let day_width = area.width.saturating_sub(goal_width) / 7;
        let grid_height = area.height.saturating_sub(TOP_ROWS);
        let week_height = grid_height / CALENDAR_WEEKS as u16;
        let grid_top = area.y + TOP_ROWS.min(area.height);

        let mut week_slots = Vec::with_capacity(CALENDAR_WEEKS);
        let mut days = Vec::with_capacity(CALENDAR_WEEKS);
        for week in 0..CALENDAR_WEEKS as u16 {
            let y = grid_top + week * week_height;
            week_slots.push(Rect::new(area.x, y, goal_width, week_height));
            let row = (0..7u16)
                .map(|d| Rect::new(area.x + goal_width + d * day_width, y, day_width, week_height))
                .collect();
            days.push(row);
        }

        CalendarLayout {
            title: row_rect(area, 0),
            year_slot: row_rect(area, 1),
            month_slot: row_rect(area, 2),
            header: row_rect(area, 3),
            week_slots,
            days,
        }
    }

    pub fn hit(&self, col: u16, row: u16) -> Option<CalendarHit> {
        if inside(self.year_slot, col, row) {
            return Some(CalendarHit::YearSlot);
        }
        if inside(self.month_slot, col, row) {
            return Some(CalendarHit::MonthSlot);
        }
        for (week, slot) in self.week_slots.iter().enumerate() {
            if inside(*slot, col, row) {
                return Some(CalendarHit::WeekSlot(week));
            }
        }
        for (week, row_rects) in self.days.iter().enumerate() {
            for (day, r) in row_rects.iter().enumerate() {
                if inside(*r, col, row) {
                    return Some(CalendarHit::Day {
                        week,
                        day,
                        line: usize::from(row - r.y),
                    });
                }
            }
        }
        None
    }
}

/// Render the month calendar: goal slots above a five-week grid
pub fn render_calendar_view(frame: &mut Frame, app: &App, area: Rect) {
    let layout = CalendarLayout::new(area);
    let scene = &app.scenes.calendar;
    let bg = app.theme.background;
    let bright = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!(" {}", scene.title()), bright))),
        layout.title,
    );
    render_slot(frame, app, layout.year_slot, "Year", scene.year_goal.as_ref());
    render_slot(frame, app, layout.month_slot, "Month", scene.month_goal.as_ref());
    render_header(frame, app, &layout);

    for (i, week) in scene.weeks.iter().enumerate() {
        let (Some(slot), Some(cells)) = (layout.week_slots.get(i), layout.days.get(i)) else {
            continue;
        };
        render_week_goal(frame, app, *slot, week.goal.as_ref());
        for (cell, r) in week.days.iter().zip(cells) {
            render_day(frame, app, *r, cell);
        }
    }
}

fn render_slot(frame: &mut Frame, app: &App, area: Rect, label: &str, goal: Option<&GoalRef>) {
    let bg = app.theme.background;
    let label_span = Span::styled(
        format!(" {} goal: ", label),
        Style::default().fg(app.theme.dim).bg(bg),
    );
    let value = match goal {
        Some(g) => Span::styled(g.title.clone(), Style::default().fg(app.theme.yellow).bg(bg)),
        None => Span::styled("(click to set)", Style::default().fg(app.theme.dim).bg(bg)),
    };
    frame.render_widget(Paragraph::new(Line::from(vec![label_span, value])), area);
}

fn render_header(frame: &mut Frame, app: &App, layout: &CalendarLayout) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let Some(first_row) = layout.days.first() else {
        return;
    };
    let mut spans = Vec::new();
    let goal_width = layout.week_slots.first().map_or(0, |r| r.width);
    spans.push(Span::styled(fit_to_width(" Week goal", usize::from(goal_width)), dim));
    for (name, r) in WEEKDAYS.iter().zip(first_row) {
        let weekend = *name == "Sun" || *name == "Sat";
        let style = if weekend {
            Style::default().fg(app.theme.weekend).bg(bg)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        spans.push(Span::styled(fit_to_width(name, usize::from(r.width)), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), layout.header);
}

fn render_week_goal(frame: &mut Frame, app: &App, area: Rect, goal: Option<&GoalRef>) {
    if area.height == 0 {
        return;
    }
    let width = usize::from(area.width.saturating_sub(1));
    let bg = app.theme.background;
    let line = match goal {
        Some(g) => Line::from(Span::styled(
            truncate_to_width(&g.title, width),
            Style::default().fg(app.theme.cyan).bg(bg),
        )),
        None => Line::from(Span::styled("\u{00b7}", Style::default().fg(app.theme.dim).bg(bg))),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_day(frame: &mut Frame, app: &App, area: Rect, cell: &CalendarCell) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let bg = if cell.is_today {
        app.theme.today_bg
    } else {
        app.theme.background
    };
    let width = usize::from(area.width.saturating_sub(1));

    let date_fg = if is_weekend(cell.date) {
        app.theme.weekend
    } else if cell.date.month() == app.scenes.calendar.reference.month() {
        app.theme.text_bright
    } else {
        app.theme.dim
    };
    let mut lines = vec![Line::from(Span::styled(
        truncate_to_width(&month_day_label(cell.date), width),
        Style::default().fg(date_fg).bg(bg),
    ))];

    for entry in &cell.entries {
        let mut style = Style::default().fg(app.theme.member_color(entry.member)).bg(bg);
        if entry.complete {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        if app.selected.as_ref() == Some(&entry.id) {
            style = style.bg(app.theme.selection_bg).add_modifier(Modifier::BOLD);
        }
        let text = format!("{} {}", entry.icon, entry.title);
        lines.push(Line::from(Span::styled(truncate_to_width(&text, width), style)));
    }

    for event in &cell.events {
        let (mark, fg) = if event.high_confidence {
            (HIGH_CONFIDENCE_MARK, app.theme.event_high)
        } else {
            (LOW_CONFIDENCE_MARK, app.theme.event_low)
        };
        let text = format!("{}{}", mark, event.title);
        lines.push(Line::from(Span::styled(
            truncate_to_width(&text, width),
            Style::default().fg(fg).bg(bg),
        )));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, Rect::new(area.x, area.y, area.width.saturating_sub(1), area.height));
}
