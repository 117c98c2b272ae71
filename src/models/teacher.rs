//! Teacher model.
//!
//! Teachers are the people placed into timetable slots. Each teacher has
//! a set of courses they may teach, an optional availability grid and,
//! for quota teachers, a minimum weekly load.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Availability;

/// Minimum weekly hours a quota teacher must be assigned.
pub const QUOTA_MIN_HOURS: u32 = 14;

/// A teacher that can be assigned to course sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the teacher holds a post requiring [`QUOTA_MIN_HOURS`] per week.
    pub has_quota: bool,
    /// Course IDs this teacher may teach.
    pub courses: BTreeSet<String>,
    /// Availability grid. `None` = fully available.
    pub availability: Option<Availability>,
}

impl Teacher {
    /// Creates a teacher with no courses and full availability.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            has_quota: false,
            courses: BTreeSet::new(),
            availability: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the teacher as a quota holder.
    pub fn with_quota(mut self) -> Self {
        self.has_quota = true;
        self
    }

    /// Adds a course the teacher may teach.
    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.courses.insert(course_id.into());
        self
    }

    /// Sets the availability grid.
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = Some(availability);
        self
    }

    /// Whether the teacher may teach the given course.
    pub fn can_teach(&self, course_id: &str) -> bool {
        self.courses.contains(course_id)
    }

    /// Whether the teacher can be placed at (day, period).
    ///
    /// Returns `true` when no availability grid is set.
    pub fn is_available(&self, day: usize, period: usize) -> bool {
        match &self.availability {
            None => true,
            Some(grid) => grid.is_available(day, period),
        }
    }

    /// Hours still missing to reach the quota, given an assigned load.
    ///
    /// Always 0 for teachers without a quota.
    pub fn quota_shortfall(&self, assigned_hours: u32) -> u32 {
        if self.has_quota {
            QUOTA_MIN_HOURS.saturating_sub(assigned_hours)
        } else {
            0
        }
    }

    /// Whether the teacher would still be under quota with `assigned_hours`.
    pub fn needs_hours(&self, assigned_hours: u32) -> bool {
        self.quota_shortfall(assigned_hours) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekLayout;

    #[test]
    fn test_teacher_builder() {
        let t = Teacher::new("T1")
            .with_name("Ada")
            .with_quota()
            .with_course("PIANO")
            .with_course("THEORY");

        assert_eq!(t.id, "T1");
        assert_eq!(t.name, "Ada");
        assert!(t.has_quota);
        assert!(t.can_teach("PIANO"));
        assert!(!t.can_teach("VIOLIN"));
    }

    #[test]
    fn test_availability_default_full() {
        let t = Teacher::new("T1");
        assert!(t.is_available(0, 0));
        assert!(t.is_available(4, 9));
    }

    #[test]
    fn test_availability_grid() {
        let grid = Availability::full(WeekLayout::new(4)).with_blocked(2, 1);
        let t = Teacher::new("T1").with_availability(grid);
        assert!(t.is_available(2, 0));
        assert!(!t.is_available(2, 1));
        assert!(!t.is_available(2, 8)); // outside grid
    }

    #[test]
    fn test_quota_shortfall() {
        let quota = Teacher::new("Q").with_quota();
        assert_eq!(quota.quota_shortfall(10), 4);
        assert_eq!(quota.quota_shortfall(20), 0);
        assert!(quota.needs_hours(13));
        assert!(!quota.needs_hours(14));

        let free = Teacher::new("F");
        assert_eq!(free.quota_shortfall(0), 0);
    }
}
