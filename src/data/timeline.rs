//! Dated events shown alongside the migration map

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::types::{Date, Year};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    #[display(fmt = "innovation")]
    Innovation,
    #[display(fmt = "culture")]
    Culture,
    #[display(fmt = "language")]
    Language,
    #[display(fmt = "genetic")]
    Genetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub date: Year,
    pub label: String,
    pub category: EventCategory,
    #[serde(default)]
    pub description: String,
    pub color: String,
}

/// Events kept sorted by date
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn new(mut events: Vec<TimelineEvent>) -> Self {
        events.sort_by_key(|e| e.date);
        Self { events }
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Every event on or before `date`
    pub fn events_until(&self, date: Date) -> &[TimelineEvent] {
        let idx = self.events.partition_point(|e| f64::from(e.date) <= date);
        &self.events[..idx]
    }

    /// Most recent event on or before `date`
    pub fn latest_at(&self, date: Date) -> Option<&TimelineEvent> {
        self.events_until(date).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, date: Year) -> TimelineEvent {
        TimelineEvent {
            id: id.into(),
            date,
            label: id.into(),
            category: EventCategory::Culture,
            description: String::new(),
            color: "#fff".into(),
        }
    }

    #[test]
    fn test_latest_at() {
        let timeline = Timeline::new(vec![event("b", -3000), event("a", -4000), event("c", -2000)]);
        assert_eq!(timeline.events()[0].id, "a");
        assert!(timeline.latest_at(-4500.0).is_none());
        assert_eq!(timeline.latest_at(-3000.0).unwrap().id, "b");
        assert_eq!(timeline.latest_at(-2500.0).unwrap().id, "b");
        assert_eq!(timeline.events_until(-1000.0).len(), 3);
    }
}
