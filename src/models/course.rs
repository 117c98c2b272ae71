//! Course and course-section models.
//!
//! A course describes what is taught (level, weekly hours, equipment);
//! a section is one group of students taking that course.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Level;

/// A course taught during the week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Education level.
    pub level: Level,
    /// Required weekly hours (one hour = one period).
    pub weekly_hours: u32,
    /// Equipment tags the room must provide.
    pub equipment: BTreeSet<String>,
}

impl Course {
    /// Creates a course.
    pub fn new(id: impl Into<String>, level: Level, weekly_hours: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            level,
            weekly_hours,
            equipment: BTreeSet::new(),
        }
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a required equipment tag.
    pub fn with_equipment(mut self, tag: impl Into<String>) -> Self {
        self.equipment.insert(tag.into());
        self
    }
}

/// A (course, section) pair to be placed in the timetable.
///
/// The `section` identifier names the student group. Several sections
/// of different courses share a group identifier when the same group
/// takes several courses; the group cannot attend two of them at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSection {
    /// The course taught.
    pub course: Course,
    /// Section (student group) identifier.
    pub section: String,
    /// Teacher that must teach this section, if mandated.
    pub required_teacher: Option<String>,
}

impl CourseSection {
    /// Creates a section with no mandated teacher.
    pub fn new(course: Course, section: impl Into<String>) -> Self {
        Self {
            course,
            section: section.into(),
            required_teacher: None,
        }
    }

    /// Mandates a specific teacher.
    pub fn with_required_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.required_teacher = Some(teacher_id.into());
        self
    }

    /// Weekly hours required by the course.
    #[inline]
    pub fn weekly_hours(&self) -> u32 {
        self.course.weekly_hours
    }

    /// Hours still to place given how many are already placed.
    #[inline]
    pub fn hours_remaining(&self, hours_placed: u32) -> u32 {
        self.course.weekly_hours.saturating_sub(hours_placed)
    }

    /// Whether the required hours are covered.
    pub fn is_complete(&self, hours_placed: u32) -> bool {
        hours_placed >= self.course.weekly_hours
    }

    /// The (course id, section id) identity pair.
    pub fn key(&self) -> (&str, &str) {
        (&self.course.id, &self.section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let c = Course::new("PIANO", Level::Primary, 4)
            .with_name("Piano I")
            .with_equipment("piano");
        assert_eq!(c.id, "PIANO");
        assert_eq!(c.name, "Piano I");
        assert_eq!(c.weekly_hours, 4);
        assert!(c.equipment.contains("piano"));
    }

    #[test]
    fn test_hours_remaining() {
        let s = CourseSection::new(Course::new("C", Level::Primary, 3), "A");
        assert_eq!(s.hours_remaining(0), 3);
        assert_eq!(s.hours_remaining(2), 1);
        assert_eq!(s.hours_remaining(5), 0);
        assert!(!s.is_complete(2));
        assert!(s.is_complete(3));
    }

    #[test]
    fn test_section_key() {
        let s = CourseSection::new(Course::new("C", Level::Primary, 3), "A")
            .with_required_teacher("T9");
        assert_eq!(s.key(), ("C", "A"));
        assert_eq!(s.required_teacher.as_deref(), Some("T9"));
    }
}
