//! Input validation for timetabling problems.
//!
//! Checks structural integrity of teachers, sections, and rooms before
//! a catalog is built. Detects:
//! - Duplicate teacher / room IDs
//! - Duplicate (course, section) pairs
//! - Availability grids that do not match the week layout
//! - A week layout without periods, or with other than five days
//!
//! Missing mandatory teachers and sections without a suitable room are
//! not reported here: they are data-quality conditions the search runs
//! around (see [`crate::models::SkipReason`]).

use crate::models::{CourseSection, Room, Teacher, WeekLayout, DAYS_PER_WEEK};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// The same (course, section) pair is listed twice.
    DuplicateSection,
    /// A teacher's availability grid has the wrong shape.
    InvalidAvailability,
    /// The week layout has no days or no periods.
    EmptyLayout,
    /// The week layout does not have five teaching days.
    InvalidWeekLength,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates the input data for a timetabling problem.
///
/// Checks:
/// 1. The layout has five days and at least one period
/// 2. No duplicate teacher IDs
/// 3. No duplicate room IDs
/// 4. No duplicate (course, section) pairs
/// 5. Every explicit availability grid matches the layout
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    teachers: &[Teacher],
    sections: &[CourseSection],
    rooms: &[Room],
    layout: WeekLayout,
) -> ValidationResult {
    let mut errors = Vec::new();

    if layout.days == 0 || layout.periods == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyLayout,
            format!(
                "Week layout must have days and periods (got {}x{})",
                layout.days, layout.periods
            ),
        ));
    } else if layout.days != DAYS_PER_WEEK {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWeekLength,
            format!(
                "Week layout must have {} days (got {})",
                DAYS_PER_WEEK, layout.days
            ),
        ));
    }

    let mut teacher_ids = HashSet::new();
    for t in teachers {
        if !teacher_ids.insert(t.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate teacher ID: {}", t.id),
            ));
        }
        if let Some(grid) = &t.availability {
            if !grid.matches(layout) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidAvailability,
                    format!(
                        "Teacher '{}' availability does not match a {}x{} week",
                        t.id, layout.days, layout.periods
                    ),
                ));
            }
        }
    }

    let mut room_ids = HashSet::new();
    for r in rooms {
        if !room_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", r.id),
            ));
        }
    }

    let mut section_keys = HashSet::new();
    for s in sections {
        if !section_keys.insert(s.key()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateSection,
                format!(
                    "Course '{}' lists section '{}' twice",
                    s.course.id, s.section
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
