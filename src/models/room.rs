//! Room model and education levels.
//!
//! Rooms host assignments. A room's suitability for a course depends on
//! its education level and the equipment it carries.
//!
//! # Level Rule
//! Early-years rooms are reserved for early-years courses, and early-years
//! courses may only use early-years rooms. Every other level pairing is
//! compatible.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Education level tag shared by rooms and courses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Early-years education (reserved rooms).
    EarlyYears,
    /// Primary education.
    Primary,
    /// Secondary education.
    Secondary,
    /// Upper-secondary / baccalaureate.
    Baccalaureate,
    /// Any level accepted (general-purpose rooms).
    All,
    /// Domain-specific level.
    Custom(String),
}

impl Level {
    /// Whether this is the early-years level.
    #[inline]
    pub fn is_early_years(&self) -> bool {
        matches!(self, Level::EarlyYears)
    }

    /// Whether a room at `self` can host a course at `course_level`.
    pub fn admits(&self, course_level: &Level) -> bool {
        self.is_early_years() == course_level.is_early_years()
    }
}

/// A physical room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Education level the room is intended for.
    pub level: Level,
    /// Equipment tags available in the room.
    pub equipment: BTreeSet<String>,
}

impl Room {
    /// Creates a room with no equipment.
    pub fn new(id: impl Into<String>, level: Level) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity: 0,
            level,
            equipment: BTreeSet::new(),
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Adds an equipment tag.
    pub fn with_equipment(mut self, tag: impl Into<String>) -> Self {
        self.equipment.insert(tag.into());
        self
    }

    /// Whether the room may host a course of the given level.
    pub fn suits_level(&self, course_level: &Level) -> bool {
        self.level.admits(course_level)
    }

    /// Whether the room carries every required equipment tag.
    pub fn has_equipment<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        required.into_iter().all(|tag| self.equipment.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::new("F-101", Level::EarlyYears)
            .with_name("Playroom")
            .with_capacity(24)
            .with_equipment("keyboard");

        assert_eq!(r.id, "F-101");
        assert_eq!(r.name, "Playroom");
        assert_eq!(r.capacity, 24);
        assert!(r.equipment.contains("keyboard"));
    }

    #[test]
    fn test_early_years_rule() {
        let early = Room::new("E", Level::EarlyYears);
        let general = Room::new("G", Level::All);

        assert!(early.suits_level(&Level::EarlyYears));
        assert!(!early.suits_level(&Level::Primary));
        assert!(!general.suits_level(&Level::EarlyYears));
        assert!(general.suits_level(&Level::Secondary));
        assert!(general.suits_level(&Level::Custom("intensive".into())));
    }

    #[test]
    fn test_equipment() {
        let r = Room::new("B-1", Level::All)
            .with_equipment("piano")
            .with_equipment("mirror");
        let needs: Vec<String> = vec!["piano".into()];
        let missing: Vec<String> = vec!["piano".into(), "drums".into()];

        assert!(r.has_equipment(&needs));
        assert!(!r.has_equipment(&missing));
        assert!(r.has_equipment(&Vec::<String>::new()));
    }
}
