use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from planboard.toml (every field optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Width of one day column, in terminal cells
    #[serde(default = "default_day_width")]
    pub day_width: u16,
    /// Days shown before the reference date
    #[serde(default = "default_lead_days")]
    pub lead_days: i64,
    /// Width of the row label gutter, in terminal cells
    #[serde(default = "default_label_width")]
    pub label_width: u16,
    /// Whether goals and bottlenecks get timeline rows at startup
    #[serde(default)]
    pub show_goals: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        TimelineConfig {
            day_width: default_day_width(),
            lead_days: default_lead_days(),
            label_width: default_label_width(),
            show_goals: false,
        }
    }
}

fn default_day_width() -> u16 {
    4
}

fn default_lead_days() -> i64 {
    7
}

fn default_label_width() -> u16 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-member colors keyed by member code (`p`, `m`, `a`, `b`)
    #[serde(default)]
    pub member_colors: HashMap<String, String>,
    /// Share of the main view given to the map canvas (rest is timeline)
    #[serde(default = "default_split_percent")]
    pub split_percent: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            colors: HashMap::new(),
            member_colors: HashMap::new(),
            split_percent: default_split_percent(),
        }
    }
}

fn default_split_percent() -> u16 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log directory; relative paths resolve against the board's directory
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsConfig {
    /// External event feed (JSON); relative paths resolve against the board's directory
    #[serde(default)]
    pub file: Option<String>,
}
