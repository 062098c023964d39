use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::util::date::parse_date;

/// A read-only dated event from an external feed (production, inventory)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalEvent {
    pub title: String,
    /// `YYYY-MM-DD`
    pub start: String,
    #[serde(default)]
    pub extended_props: EventProps,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventProps {
    #[serde(default)]
    pub confidence: String,
    #[serde(default)]
    pub details: String,
}

impl ExternalEvent {
    pub fn is_high_confidence(&self) -> bool {
        self.extended_props.confidence == "high"
    }

    /// The event's day; `None` for a missing or malformed date
    pub fn date(&self) -> Option<NaiveDate> {
        if self.start.trim().is_empty() {
            return None;
        }
        parse_date(&self.start, NaiveDate::MIN)
    }
}
