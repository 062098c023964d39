use serde::Serialize;

use crate::model::{Note, NoteKind};
use crate::projection::calendar::{CalendarCell, GoalRef};
use crate::projection::{CalendarScene, TimelineScene};
use crate::util::date::{format_date, month_day_label};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct NoteJson {
    pub id: String,
    pub title: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<&'static str>,
    pub member: &'static str,
    pub icon: String,
    pub complete: bool,
    pub workshop: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

#[derive(Serialize)]
pub struct BoardJson {
    pub notes: Vec<NoteJson>,
    pub links: Vec<LinkJson>,
}

#[derive(Serialize)]
pub struct LinkJson {
    pub from: String,
    pub to: String,
}

#[derive(Serialize)]
pub struct CountJson {
    pub count: usize,
}

#[derive(Serialize)]
pub struct TimelineRowJson {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub workshop: bool,
    pub complete: bool,
}

#[derive(Serialize)]
pub struct TimelineJson {
    pub reference: String,
    pub rows: Vec<TimelineRowJson>,
}

#[derive(Serialize)]
pub struct EventJson {
    pub title: String,
    pub high_confidence: bool,
}

#[derive(Serialize)]
pub struct DayJson {
    pub date: String,
    pub today: bool,
    pub notes: Vec<String>,
    pub events: Vec<EventJson>,
}

#[derive(Serialize)]
pub struct WeekJson {
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    pub days: Vec<DayJson>,
}

#[derive(Serialize)]
pub struct CalendarJson {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_goal: Option<String>,
    pub weeks: Vec<WeekJson>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn kind_name(kind: NoteKind) -> &'static str {
    match kind {
        NoteKind::Task => "task",
        NoteKind::Goal { .. } => "goal",
        NoteKind::Bottleneck { .. } => "bottleneck",
    }
}

pub fn note_to_json(note: &Note) -> NoteJson {
    NoteJson {
        id: note.id.to_string(),
        title: note.title.clone(),
        kind: kind_name(note.kind),
        timeframe: note.goal_timeframe().map(|tf| tf.as_str()),
        member: note.member.code(),
        icon: note.icon.clone(),
        complete: note.complete,
        workshop: note.is_workshop(),
        start: note.start.map(format_date),
        end: note.end.map(format_date),
        memo: note.memo.clone(),
    }
}

pub fn timeline_to_json(scene: &TimelineScene) -> TimelineJson {
    TimelineJson {
        reference: format_date(scene.reference),
        rows: scene
            .bars
            .iter()
            .map(|b| TimelineRowJson {
                id: b.id.to_string(),
                title: b.title.clone(),
                start: format_date(b.start),
                end: format_date(b.end),
                workshop: b.workshop,
                complete: b.complete,
            })
            .collect(),
    }
}

fn goal_title(goal: Option<&GoalRef>) -> Option<String> {
    goal.map(|g| g.title.clone())
}

pub fn calendar_to_json(scene: &CalendarScene) -> CalendarJson {
    CalendarJson {
        title: scene.title(),
        year_goal: goal_title(scene.year_goal.as_ref()),
        month_goal: goal_title(scene.month_goal.as_ref()),
        weeks: scene
            .weeks
            .iter()
            .map(|w| WeekJson {
                start: format_date(w.start),
                goal: goal_title(w.goal.as_ref()),
                days: w
                    .days
                    .iter()
                    .map(|d| DayJson {
                        date: format_date(d.date),
                        today: d.is_today,
                        notes: d.entries.iter().map(|e| e.title.clone()).collect(),
                        events: d
                            .events
                            .iter()
                            .map(|e| EventJson {
                                title: e.title.clone(),
                                high_confidence: e.high_confidence,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn span_text(note: &Note) -> Option<String> {
    let start = note.start?;
    match note.end {
        Some(end) if end != start => Some(format!("{}..{}", format_date(start), format_date(end))),
        _ => Some(format_date(start)),
    }
}

/// One-line summary: `[x] <id> <icon> <title> (<member>) <dates> <flags>`
pub fn format_note_line(note: &Note) -> String {
    let check = if note.complete { 'x' } else { ' ' };
    let mut line = format!(
        "[{}] {} {} {} ({})",
        check,
        note.id,
        note.icon,
        note.title,
        note.member.label()
    );
    if let Some(span) = span_text(note) {
        line.push(' ');
        line.push_str(&span);
    }
    if let Some(tf) = note.goal_timeframe() {
        line.push_str(&format!(" goal:{}", tf.as_str()));
    }
    if note.is_bottleneck() {
        line.push_str(" !bottleneck");
    }
    if note.is_workshop() {
        line.push_str(" @workshop");
    }
    line
}

/// One row per bar: dates, a day strip across the window, then the title.
/// The strip marks the reference day with `|` where the bar does not cover it.
pub fn format_timeline(scene: &TimelineScene) -> Vec<String> {
    let mut lines = vec![format!("timeline around {}", format_date(scene.reference))];
    if scene.bars.is_empty() {
        lines.push("  (no dated notes)".to_string());
        return lines;
    }
    for bar in &scene.bars {
        let strip: String = scene
            .header
            .iter()
            .map(|day| {
                if day.date >= bar.start && day.date <= bar.end {
                    if bar.complete { '=' } else { '#' }
                } else if day.is_reference {
                    '|'
                } else {
                    '.'
                }
            })
            .collect();
        let zone = if bar.workshop { "W" } else { " " };
        lines.push(format!(
            "{} {} {} {} {}",
            format_date(bar.start),
            format_date(bar.end),
            zone,
            strip,
            bar.title
        ));
    }
    lines
}

fn format_day(cell: &CalendarCell) -> Option<String> {
    if cell.entries.is_empty() && cell.events.is_empty() {
        return None;
    }
    let mut items: Vec<String> = cell
        .entries
        .iter()
        .map(|e| {
            let done = if e.complete { " (done)" } else { "" };
            format!("{} {}{}", e.icon, e.title, done)
        })
        .collect();
    items.extend(cell.events.iter().map(|e| {
        let mark = if e.high_confidence { "\u{2694}\u{fe0f}" } else { "\u{2753}" };
        format!("{} {}", mark, e.title)
    }));
    let today = if cell.is_today { "*" } else { " " };
    Some(format!(
        "  {}{:<6}{} {}",
        today,
        month_day_label(cell.date),
        cell.date.format("%a"),
        items.join("; ")
    ))
}

/// The calendar as text: goals, then each week with its busy days
pub fn format_calendar(scene: &CalendarScene) -> Vec<String> {
    let mut lines = vec![scene.title()];
    let none = "-".to_string();
    lines.push(format!(
        "year goal:  {}",
        goal_title(scene.year_goal.as_ref()).unwrap_or_else(|| none.clone())
    ));
    lines.push(format!(
        "month goal: {}",
        goal_title(scene.month_goal.as_ref()).unwrap_or_else(|| none.clone())
    ));
    for week in &scene.weeks {
        lines.push(String::new());
        lines.push(format!(
            "week of {}: {}",
            month_day_label(week.start),
            goal_title(week.goal.as_ref()).unwrap_or_else(|| none.clone())
        ));
        lines.extend(week.days.iter().filter_map(format_day));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Member, NoteId, Timeframe};
    use crate::projection::{TimelineOptions, project_calendar, project_timeline};
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn kiln() -> Note {
        let mut n = Note::new(NoteId::from("7"), "Kiln");
        n.start = Some(d("2026-01-10"));
        n.end = Some(d("2026-01-12"));
        n.member = Member::Mama;
        n.category = Some("workshop".into());
        n
    }

    #[test]
    fn note_line_lists_flags() {
        let mut n = kiln();
        n.kind = NoteKind::Bottleneck {
            goal: Some(Timeframe::Month),
        };
        let line = format_note_line(&n);
        assert!(line.starts_with("[ ] 7 "));
        assert!(line.contains("Kiln (Mama) 2026-01-10..2026-01-12"));
        assert!(line.contains("goal:month"));
        assert!(line.contains("!bottleneck"));
        assert!(line.ends_with("@workshop"));
    }

    #[test]
    fn note_json_shape() {
        let json = serde_json::to_value(note_to_json(&kiln())).unwrap();
        assert_eq!(json["kind"], "task");
        assert_eq!(json["member"], "m");
        assert_eq!(json["end"], "2026-01-12");
        assert!(json.get("timeframe").is_none());
        assert!(json.get("memo").is_none());
    }

    #[test]
    fn timeline_strip_covers_bar_days() {
        let scene = project_timeline(&[kiln()], d("2026-01-10"), TimelineOptions::default(), None);
        let lines = format_timeline(&scene);
        assert_eq!(lines.len(), 2);
        // Seven lead days, then three covered days
        assert!(lines[1].contains(" W .......###...."));
        assert!(lines[1].ends_with("Kiln"));
    }

    #[test]
    fn calendar_lists_busy_days_only() {
        let scene = project_calendar(&[kiln()], &[], d("2026-01-10"), d("2026-01-10"));
        let lines = format_calendar(&scene);
        assert_eq!(lines[0], "2026/1");
        let busy: Vec<&String> = lines.iter().filter(|l| l.contains("Kiln")).collect();
        assert_eq!(busy.len(), 3);
        assert!(busy[0].contains("*1/10"));
    }
}
