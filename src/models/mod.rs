//! Timetabling domain models.
//!
//! Reference data (teachers, rooms, courses, sections) is loaded once and
//! held in a shared [`Catalog`]. Candidate timetables ([`Schedule`]s) refer
//! to catalog entries by index.
//!
//! # Domain Mappings
//!
//! | u-timetable | School | University | Training centre |
//! |-------------|--------|------------|-----------------|
//! | Teacher | Teacher | Lecturer | Instructor |
//! | CourseSection | Class group × subject | Course offering | Session group |
//! | Room | Classroom | Lecture hall | Studio |
//! | Schedule | Weekly timetable | Term timetable | Weekly plan |

mod catalog;
mod constraint;
mod course;
mod room;
mod schedule;
mod teacher;
mod week;

pub use catalog::{Catalog, SkipReason, SkippedSection, TeacherChoice};
pub use constraint::{Constraint, ConstraintClass};
pub use course::{Course, CourseSection};
pub use room::{Level, Room};
pub use schedule::{Assignment, MatrixKind, Schedule};
pub use teacher::{Teacher, QUOTA_MIN_HOURS};
pub use week::{Availability, TimeSlot, WeekLayout, DAYS_PER_WEEK, DEFAULT_PERIODS_PER_DAY};
