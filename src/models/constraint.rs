//! Timetabling constraints.
//!
//! Each rule is a pure function of a [`Schedule`] returning a non-negative
//! violation count. Rules are either hard (must be zero for a schedule to
//! be valid) or soft (preferences that degrade quality).
//!
//! The overlap rules recompute double-bookings from the assignment list
//! instead of trusting the schedule's indices, so they also see
//! assignments introduced by in-place edits.
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent research directions in automated timetabling"

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{MatrixKind, Schedule};

/// Whether a rule is hard or soft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintClass {
    /// Must be zero for validity.
    Hard,
    /// Preference only.
    Soft,
}

/// A timetabling rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    /// Excess assignments per (teacher, day, period) beyond the first.
    TeacherNoOverlap,
    /// Excess assignments per (room, day, period) beyond the first.
    RoomNoOverlap,
    /// Excess assignments per (section group, day, period) beyond the first.
    SectionNoOverlap,
    /// Hours missing to reach the weekly quota, summed over quota teachers.
    TeacherMinHours,
    /// Early-years rooms hosting other courses, and vice versa.
    RoomLevelMatch,
    /// Assignments taught by someone other than the mandated teacher.
    SpecificTeacherAssignment,
    /// Free periods between a teacher's classes.
    MinimizeGaps,
    /// Spread of each teacher's daily load (std dev × 10, truncated).
    BalancedDistribution,
}

impl Constraint {
    /// Every rule, hard rules first.
    pub const ALL: [Constraint; 8] = [
        Constraint::TeacherNoOverlap,
        Constraint::RoomNoOverlap,
        Constraint::SectionNoOverlap,
        Constraint::TeacherMinHours,
        Constraint::RoomLevelMatch,
        Constraint::SpecificTeacherAssignment,
        Constraint::MinimizeGaps,
        Constraint::BalancedDistribution,
    ];

    /// Rule name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::TeacherNoOverlap => "TeacherNoOverlap",
            Constraint::RoomNoOverlap => "RoomNoOverlap",
            Constraint::SectionNoOverlap => "SectionNoOverlap",
            Constraint::TeacherMinHours => "TeacherMinHours",
            Constraint::RoomLevelMatch => "RoomLevelMatch",
            Constraint::SpecificTeacherAssignment => "SpecificTeacherAssignment",
            Constraint::MinimizeGaps => "MinimizeGaps",
            Constraint::BalancedDistribution => "BalancedDistribution",
        }
    }

    /// Hard or soft.
    pub fn class(&self) -> ConstraintClass {
        match self {
            Constraint::MinimizeGaps | Constraint::BalancedDistribution => ConstraintClass::Soft,
            _ => ConstraintClass::Hard,
        }
    }

    /// Violation count of this rule against a schedule.
    pub fn evaluate(&self, schedule: &Schedule) -> u64 {
        match self {
            Constraint::TeacherNoOverlap => overlap_excess(schedule, MatrixKind::Teacher),
            Constraint::RoomNoOverlap => overlap_excess(schedule, MatrixKind::Room),
            Constraint::SectionNoOverlap => overlap_excess(schedule, MatrixKind::Section),
            Constraint::TeacherMinHours => quota_shortfall(schedule),
            Constraint::RoomLevelMatch => level_mismatches(schedule),
            Constraint::SpecificTeacherAssignment => teacher_breaches(schedule),
            Constraint::MinimizeGaps => total_gaps(schedule),
            Constraint::BalancedDistribution => imbalance(schedule),
        }
    }
}

fn overlap_excess(schedule: &Schedule, kind: MatrixKind) -> u64 {
    let mut counts: HashMap<(usize, usize, usize), u64> = HashMap::new();
    for a in schedule.assignments() {
        *counts
            .entry((schedule.entity_of(kind, a), a.day, a.period))
            .or_insert(0) += 1;
    }
    counts.values().map(|&n| n - 1).sum()
}

fn quota_shortfall(schedule: &Schedule) -> u64 {
    schedule
        .catalog()
        .teachers()
        .iter()
        .enumerate()
        .map(|(i, t)| t.quota_shortfall(schedule.teacher_hours(i)) as u64)
        .sum()
}

fn level_mismatches(schedule: &Schedule) -> u64 {
    let catalog = schedule.catalog();
    schedule
        .assignments()
        .iter()
        .filter(|a| {
            let room = catalog.room(a.room);
            let course = &catalog.section(a.section).course;
            !room.suits_level(&course.level)
        })
        .count() as u64
}

fn teacher_breaches(schedule: &Schedule) -> u64 {
    let catalog = schedule.catalog();
    schedule
        .assignments()
        .iter()
        .filter(|a| match &catalog.section(a.section).required_teacher {
            Some(required) => catalog.teacher(a.teacher).id != *required,
            None => false,
        })
        .count() as u64
}

fn total_gaps(schedule: &Schedule) -> u64 {
    schedule
        .active_teachers()
        .into_iter()
        .map(|t| schedule.teacher_gaps(t) as u64)
        .sum()
}

fn imbalance(schedule: &Schedule) -> u64 {
    let total: f64 = schedule
        .active_teachers()
        .into_iter()
        .map(|t| std_dev(&schedule.daily_load(t)))
        .sum();
    (total * 10.0) as u64
}

/// Population standard deviation.
fn std_dev(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}
