use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::util::date::{format_date, parse_date};

/// Icon palette offered when editing a note
pub const ICONS: [&str; 14] = [
    "📝", "📅", "🚀", "🎉", "💦", "⚠️", "💤", "🏠", "💰", "🛒", "🪵", "📐", "✨", "⚔️",
];

pub const DEFAULT_ICON: &str = "📝";

/// Category tag that places a task in the workshop zone. Any other value
/// (or none) is a booth task.
pub const WORKSHOP_CATEGORY: &str = "workshop";

/// Opaque note identifier.
///
/// Snapshots written by older boards carry numeric ids; both numbers and
/// strings are accepted and compared by their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        NoteId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        NoteId(s.to_string())
    }
}

impl Serialize for NoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Float(f64),
        }
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => NoteId(s),
            RawId::Int(n) => NoteId(n.to_string()),
            RawId::Float(f) if f.fract() == 0.0 => NoteId(format!("{}", f as i64)),
            RawId::Float(f) => NoteId(f.to_string()),
        })
    }
}

/// Person responsible for a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Member {
    #[default]
    Papa,
    Mama,
    ChildA,
    ChildB,
}

impl Member {
    pub const ALL: [Member; 4] = [Member::Papa, Member::Mama, Member::ChildA, Member::ChildB];

    /// Single-letter code used in snapshots
    pub fn code(self) -> &'static str {
        match self {
            Member::Papa => "p",
            Member::Mama => "m",
            Member::ChildA => "a",
            Member::ChildB => "b",
        }
    }

    pub fn from_code(code: &str) -> Option<Member> {
        match code {
            "p" => Some(Member::Papa),
            "m" => Some(Member::Mama),
            "a" => Some(Member::ChildA),
            "b" => Some(Member::ChildB),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Member::Papa => "Papa",
            Member::Mama => "Mama",
            Member::ChildA => "Child A",
            Member::ChildB => "Child B",
        }
    }

    pub fn next(self) -> Member {
        match self {
            Member::Papa => Member::Mama,
            Member::Mama => Member::ChildA,
            Member::ChildA => Member::ChildB,
            Member::ChildB => Member::Papa,
        }
    }
}

/// Horizon of a goal note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    Year,
    Month,
    Week,
}

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Year => "year",
            Timeframe::Month => "month",
            Timeframe::Week => "week",
        }
    }

    pub fn parse(s: &str) -> Option<Timeframe> {
        match s {
            "year" => Some(Timeframe::Year),
            "month" => Some(Timeframe::Month),
            "week" => Some(Timeframe::Week),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Timeframe::Year => "🏆",
            Timeframe::Month => "🎯",
            Timeframe::Week => "🗓️",
        }
    }

    pub fn next(self) -> Timeframe {
        match self {
            Timeframe::Year => Timeframe::Month,
            Timeframe::Month => Timeframe::Week,
            Timeframe::Week => Timeframe::Year,
        }
    }
}

/// What a note is, resolved once from the snapshot flags.
///
/// A bottleneck that was also flagged as a goal keeps its timeframe so goal
/// lookups still find it, but it is styled as a bottleneck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Task,
    Goal { timeframe: Timeframe },
    Bottleneck { goal: Option<Timeframe> },
}

/// A note on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NoteRecord", into = "NoteRecord")]
pub struct Note {
    pub id: NoteId,
    /// Model-space position
    pub x: f64,
    pub y: f64,
    pub title: String,
    pub memo: Option<String>,
    pub icon: String,
    pub member: Member,
    pub complete: bool,
    pub category: Option<String>,
    pub start: Option<NaiveDate>,
    /// Inclusive last day; `None` means the note ends on `start`
    pub end: Option<NaiveDate>,
    pub kind: NoteKind,
    /// Snapshot keys this board does not interpret, written back verbatim
    pub extra: Map<String, Value>,
}

impl Note {
    /// A plain task with default fields
    pub fn new(id: NoteId, title: impl Into<String>) -> Self {
        Note {
            id,
            x: 0.0,
            y: 0.0,
            title: title.into(),
            memo: None,
            icon: DEFAULT_ICON.to_string(),
            member: Member::default(),
            complete: false,
            category: None,
            start: None,
            end: None,
            kind: NoteKind::Task,
            extra: Map::new(),
        }
    }

    pub fn is_goal(&self) -> bool {
        self.goal_timeframe().is_some()
    }

    pub fn is_bottleneck(&self) -> bool {
        matches!(self.kind, NoteKind::Bottleneck { .. })
    }

    pub fn goal_timeframe(&self) -> Option<Timeframe> {
        match self.kind {
            NoteKind::Goal { timeframe } => Some(timeframe),
            NoteKind::Bottleneck { goal } => goal,
            NoteKind::Task => None,
        }
    }

    pub fn is_workshop(&self) -> bool {
        self.category.as_deref() == Some(WORKSHOP_CATEGORY)
    }

    /// Last active day, falling back to `start`
    pub fn end_or_start(&self) -> Option<NaiveDate> {
        self.end.or(self.start)
    }

    /// Whether `day` falls inside `[start, end]`. An end before the start
    /// still shows the note on its start day.
    pub fn active_on(&self, day: NaiveDate) -> bool {
        match (self.start, self.end_or_start()) {
            (Some(start), Some(end)) => start <= day && (end >= day || start == day),
            _ => false,
        }
    }
}

/// One field write through the single mutation entry point
#[derive(Debug, Clone, PartialEq)]
pub enum NoteField {
    Title(String),
    Memo(Option<String>),
    Icon(String),
    Member(Member),
    Start(Option<NaiveDate>),
    End(Option<NaiveDate>),
    Timeframe(Timeframe),
    Category(Option<String>),
    Complete(bool),
    Kind(NoteKind),
}

impl NoteField {
    /// Apply this write to a note. Returns false when the field does not
    /// apply (a timeframe on a plain task).
    pub fn apply(self, note: &mut Note) -> bool {
        match self {
            NoteField::Title(t) => note.title = t,
            NoteField::Memo(m) => note.memo = m.filter(|m| !m.is_empty()),
            NoteField::Icon(i) => note.icon = i,
            NoteField::Member(m) => note.member = m,
            NoteField::Start(d) => {
                note.extra.remove("start");
                note.start = d;
            }
            NoteField::End(d) => {
                note.extra.remove("end");
                note.end = d;
            }
            NoteField::Timeframe(tf) => match &mut note.kind {
                NoteKind::Goal { timeframe } => *timeframe = tf,
                NoteKind::Bottleneck { goal: Some(timeframe) } => *timeframe = tf,
                _ => return false,
            },
            NoteField::Category(c) => note.category = c.filter(|c| !c.is_empty()),
            NoteField::Complete(c) => note.complete = c,
            NoteField::Kind(k) => {
                note.extra.remove("type");
                note.extra.remove("timeframe");
                note.kind = k;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Snapshot wire form
// ---------------------------------------------------------------------------

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// Flat JSON shape of a note as stored in board snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteRecord {
    id: NoteId,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    memo: Option<String>,
    #[serde(default = "default_icon")]
    icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    member: Option<String>,
    #[serde(default)]
    complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<String>,
    #[serde(default)]
    is_goal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeframe: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    note_type: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Parse a stored date. A value that does not parse is kept in `extra`
/// under its own key so the next save writes it back unchanged.
fn record_date(
    id: &NoteId,
    field: &str,
    raw: Option<String>,
    extra: &mut Map<String, Value>,
) -> Option<NaiveDate> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    // The reference is only consulted for empty input, which is handled above.
    let parsed = parse_date(&raw, NaiveDate::MIN);
    if parsed.is_none() {
        log::warn!("note {}: keeping unparseable {} date {:?} as is", id, field, raw);
        extra.insert(field.to_string(), Value::String(raw));
    }
    parsed
}

fn take_string(extra: &mut Map<String, Value>, key: &str) -> Option<String> {
    match extra.remove(key)? {
        Value::String(s) => Some(s),
        other => {
            extra.insert(key.to_string(), other);
            None
        }
    }
}

impl From<NoteRecord> for Note {
    fn from(mut r: NoteRecord) -> Self {
        let goal = if r.is_goal {
            Some(
                r.timeframe
                    .as_deref()
                    .and_then(Timeframe::parse)
                    .unwrap_or(Timeframe::Year),
            )
        } else {
            None
        };
        let kind = match (r.note_type.as_deref(), goal) {
            (Some("bottleneck"), goal) => NoteKind::Bottleneck { goal },
            (_, Some(timeframe)) => NoteKind::Goal { timeframe },
            (_, None) => NoteKind::Task,
        };
        if let Some(other) = r.note_type.filter(|t| t != "bottleneck") {
            r.extra.insert("type".to_string(), Value::String(other));
        }
        if goal.is_none()
            && let Some(tf) = r.timeframe
        {
            r.extra.insert("timeframe".to_string(), Value::String(tf));
        }
        let start = record_date(&r.id, "start", r.start, &mut r.extra);
        let end = record_date(&r.id, "end", r.end, &mut r.extra);
        Note {
            member: r
                .member
                .as_deref()
                .and_then(Member::from_code)
                .unwrap_or_default(),
            id: r.id,
            x: if r.x.is_finite() { r.x } else { 0.0 },
            y: if r.y.is_finite() { r.y } else { 0.0 },
            title: r.title,
            memo: r.memo.filter(|m| !m.is_empty()),
            icon: if r.icon.is_empty() { default_icon() } else { r.icon },
            complete: r.complete,
            category: r.category.filter(|c| !c.is_empty()),
            start,
            end,
            kind,
            extra: r.extra,
        }
    }
}

impl From<Note> for NoteRecord {
    fn from(mut n: Note) -> Self {
        let (is_goal, timeframe, note_type) = match n.kind {
            NoteKind::Task => (false, None, None),
            NoteKind::Goal { timeframe } => (true, Some(timeframe), None),
            NoteKind::Bottleneck { goal } => (goal.is_some(), goal, Some("bottleneck".to_string())),
        };
        // Interpreted fields win over anything kept from the last load
        let kept_type = take_string(&mut n.extra, "type");
        let kept_timeframe = take_string(&mut n.extra, "timeframe");
        let kept_start = take_string(&mut n.extra, "start");
        let kept_end = take_string(&mut n.extra, "end");
        NoteRecord {
            id: n.id,
            x: n.x,
            y: n.y,
            title: n.title,
            memo: n.memo,
            icon: n.icon,
            member: Some(n.member.code().to_string()),
            complete: n.complete,
            category: n.category,
            start: n.start.map(format_date).or(kept_start),
            end: n.end.map(format_date).or(kept_end),
            is_goal,
            timeframe: timeframe.map(|tf| tf.as_str().to_string()).or(kept_timeframe),
            note_type: note_type.or(kept_type),
            extra: n.extra,
        }
    }
}
