//! Scroll-position section highlighting for the celebration view.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

pub const DEFAULT_SECTIONS: [&str; 3] = ["Home", "Gallery", "Wishes"];

/// Vertical placement of one section, in pixels from the top of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionLayout {
    pub offset_top: f64,
    pub height: f64,
}

impl SectionLayout {
    fn contains(&self, y: f64) -> bool {
        self.offset_top <= y && y < self.offset_top + self.height
    }
}

#[derive(Debug, Clone)]
pub struct SectionTracker {
    names: Vec<String>,
    active: usize,
}

impl SectionTracker {
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            active: 0,
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_name(&self) -> Option<&str> {
        self.names.get(self.active).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Recompute the active section from the scroll position.
    ///
    /// The probe line sits at the middle of the viewport. When no section
    /// spans it the previous selection stays. Layouts beyond the known names
    /// are ignored.
    pub fn update(
        &mut self,
        scroll_y: f64,
        viewport_height: f64,
        layouts: &[SectionLayout],
    ) -> Option<Event> {
        let probe = scroll_y + viewport_height / 2.0;
        let hit = layouts
            .iter()
            .take(self.names.len())
            .enumerate()
            .filter(|(_, l)| l.contains(probe))
            .map(|(i, _)| i)
            .last()?;
        self.select(hit)
    }

    /// Jump straight to a section (navigation link).
    pub fn select(&mut self, index: usize) -> Option<Event> {
        if index == self.active || index >= self.names.len() {
            return None;
        }
        self.active = index;
        Some(Event::SectionChanged {
            index,
            name: self.names[index].clone(),
            at: Utc::now(),
        })
    }
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SECTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Vec<SectionLayout> {
        vec![
            SectionLayout {
                offset_top: 0.0,
                height: 900.0,
            },
            SectionLayout {
                offset_top: 900.0,
                height: 1200.0,
            },
            SectionLayout {
                offset_top: 2100.0,
                height: 800.0,
            },
        ]
    }

    #[test]
    fn probe_uses_middle_of_viewport() {
        let mut tracker = SectionTracker::default();
        // 500 + 400 = 900: first pixel of the gallery.
        let event = tracker.update(500.0, 800.0, &page());
        assert!(matches!(event, Some(Event::SectionChanged { index: 1, .. })));
        assert_eq!(tracker.active_name(), Some("Gallery"));
    }

    #[test]
    fn unchanged_section_emits_nothing() {
        let mut tracker = SectionTracker::default();
        assert!(tracker.update(0.0, 800.0, &page()).is_none());
        assert_eq!(tracker.active(), 0);
    }

    #[test]
    fn no_match_keeps_previous_selection() {
        let mut tracker = SectionTracker::default();
        tracker.update(2000.0, 800.0, &page());
        assert_eq!(tracker.active(), 2);
        assert!(tracker.update(10_000.0, 800.0, &page()).is_none());
        assert_eq!(tracker.active(), 2);
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut tracker = SectionTracker::default();
        assert!(tracker.select(7).is_none());
        assert!(tracker.select(2).is_some());
    }
}
