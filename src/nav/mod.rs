//! Page section tracking and scroll progress
//!
//! Each section reports where its top edge currently sits; the tracker turns
//! those observations plus the scroll position into the active section,
//! header visibility and a reading-progress fraction.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Sections of the atlas page, in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[display(fmt = "hook")]
    Hook,
    #[display(fmt = "discovery")]
    Discovery,
    #[display(fmt = "dating")]
    Dating,
    #[display(fmt = "homeland")]
    Homeland,
    #[display(fmt = "family-tree")]
    FamilyTree,
    #[display(fmt = "spread")]
    Spread,
    #[display(fmt = "mythology")]
    Mythology,
    #[display(fmt = "dna")]
    Dna,
    #[display(fmt = "explorer")]
    Explorer,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Hook,
        Section::Discovery,
        Section::Dating,
        Section::Homeland,
        Section::FamilyTree,
        Section::Spread,
        Section::Mythology,
        Section::Dna,
        Section::Explorer,
    ];

    /// Navigation label
    pub fn label(self) -> &'static str {
        match self {
            Section::Hook => "Intro",
            Section::Discovery => "Discovery",
            Section::Dating => "Dating",
            Section::Homeland => "Homeland",
            Section::FamilyTree => "Family Tree",
            Section::Spread => "Migrations",
            Section::Mythology => "Mythology",
            Section::Dna => "DNA",
            Section::Explorer => "Explorer",
        }
    }
}

/// Scroll state of the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    ActiveChanged { from: Section, to: Section },
    HeaderShown,
    HeaderHidden,
}

#[derive(Debug, Clone)]
pub struct SectionTracker {
    sections: Vec<Section>,
    /// Document offset of each section's top edge, when reported
    tops: Vec<Option<f64>>,
    active: Section,
    header_visible: bool,
    progress: f64,
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new(Section::ALL.to_vec())
    }
}

impl SectionTracker {
    /// Track `sections` in document order. The first one starts active.
    pub fn new(sections: Vec<Section>) -> Self {
        let active = sections.first().copied().unwrap_or(Section::Hook);
        Self {
            tops: vec![None; sections.len()],
            sections,
            active,
            header_visible: false,
            progress: 0.0,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// A section reports its top edge. Unknown sections are ignored.
    pub fn observe(&mut self, section: Section, top: f64) {
        if let Some(i) = self.sections.iter().position(|s| *s == section) {
            self.tops[i] = Some(top);
        }
    }

    /// A section left the document (e.g. was unmounted)
    pub fn forget(&mut self, section: Section) {
        if let Some(i) = self.sections.iter().position(|s| *s == section) {
            self.tops[i] = None;
        }
    }

    pub fn active(&self) -> Section {
        self.active
    }

    pub fn is_header_visible(&self) -> bool {
        self.header_visible
    }

    /// Share of the page scrolled past, in [0, 1]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Section whose top is the last one at or above a third of the viewport
    pub fn active_for(&self, scroll: &ScrollState) -> Section {
        let line = scroll.scroll_y + scroll.viewport_height / 3.0;
        self.sections
            .iter()
            .zip(&self.tops)
            .filter_map(|(section, top)| top.filter(|t| *t <= line).map(|_| *section))
            .last()
            .unwrap_or(self.active_default())
    }

    fn active_default(&self) -> Section {
        self.sections.first().copied().unwrap_or(Section::Hook)
    }

    /// Apply a scroll position and report what changed
    pub fn update(&mut self, scroll: ScrollState) -> Vec<NavEvent> {
        let mut events = Vec::new();

        let active = self.active_for(&scroll);
        if active != self.active {
            tracing::debug!("Active section {} -> {}", self.active, active);
            events.push(NavEvent::ActiveChanged {
                from: self.active,
                to: active,
            });
            self.active = active;
        }

        let header = scroll.scroll_y > 0.8 * scroll.viewport_height;
        if header != self.header_visible {
            self.header_visible = header;
            events.push(if header {
                NavEvent::HeaderShown
            } else {
                NavEvent::HeaderHidden
            });
        }

        let scrollable = scroll.document_height - scroll.viewport_height;
        self.progress = if scrollable > 0.0 {
            (scroll.scroll_y / scrollable).clamp(0.0, 1.0)
        } else {
            0.0
        };

        events
    }
}
