//! Timetable quality metrics (KPIs).
//!
//! Computes compliance and quality indicators from a finished schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Assignments | Class hours placed |
//! | Teacher load | Hours, per-day distribution and gaps per teacher |
//! | Quota met | Quota teachers at or above 14 hours |
//! | Room hours | Occupied slots per room |
//! | Level misuse | Hours with an early-years room/course mismatch |
//! | Unfilled hours | Sum of weekly hours not placed |
//! | Completion | Fraction of sections fully placed |
//! | Breaches | Hours taught by someone other than the mandated teacher |
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling"

use serde::Serialize;

use crate::models::{Schedule, TimeSlot};

/// Load indicators for one teacher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherLoad {
    pub teacher_id: String,
    /// Hours assigned over the week.
    pub hours: u32,
    /// Hours per day, Monday first.
    pub daily: Vec<u32>,
    /// Free periods between a teacher's first and last class, summed over days.
    pub gaps: u32,
    pub has_quota: bool,
    /// Whether the quota is met (always true without a quota).
    pub quota_met: bool,
}

/// Occupancy indicators for one room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomUsage {
    pub room_id: String,
    pub occupied_hours: u32,
    /// Fraction of the week's slots in use.
    pub occupancy: f64,
    /// Hours whose course level the room does not suit.
    pub level_misuse: u32,
}

/// A class hour taught by someone other than the mandated teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherBreach {
    pub course_id: String,
    pub section_id: String,
    pub required_teacher: String,
    pub assigned_teacher: String,
    pub slot: TimeSlot,
}

/// Timetable compliance indicators.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableKpi {
    /// Class hours placed.
    pub assignments: usize,
    /// Per-teacher load, in catalog order.
    pub teacher_loads: Vec<TeacherLoad>,
    /// Per-room usage, in catalog order.
    pub room_usage: Vec<RoomUsage>,
    /// Weekly hours demanded but not placed.
    pub unfilled_hours: u32,
    /// Fraction of sections with every weekly hour placed (0.0..1.0).
    pub completion_rate: f64,
    /// Mandatory-teacher breaches.
    pub breaches: Vec<TeacherBreach>,
}

impl TimetableKpi {
    /// Computes KPIs from a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let catalog = schedule.catalog();
        let slot_count = catalog.layout().slot_count();

        let teacher_loads = catalog
            .teachers()
            .iter()
            .enumerate()
            .map(|(idx, teacher)| {
                let hours = schedule.teacher_hours(idx);
                TeacherLoad {
                    teacher_id: teacher.id.clone(),
                    hours,
                    daily: schedule.daily_load(idx),
                    gaps: schedule.teacher_gaps(idx),
                    has_quota: teacher.has_quota,
                    quota_met: !teacher.needs_hours(hours),
                }
            })
            .collect();

        let mut room_usage: Vec<RoomUsage> = catalog
            .rooms()
            .iter()
            .map(|room| RoomUsage {
                room_id: room.id.clone(),
                occupied_hours: 0,
                occupancy: 0.0,
                level_misuse: 0,
            })
            .collect();
        let mut breaches = Vec::new();

        for a in schedule.assignments() {
            let section = catalog.section(a.section);
            let room = catalog.room(a.room);
            let usage = &mut room_usage[a.room];
            usage.occupied_hours += 1;
            if !room.suits_level(&section.course.level) {
                usage.level_misuse += 1;
            }

            let assigned = &catalog.teacher(a.teacher).id;
            if let Some(required) = &section.required_teacher {
                if assigned != required {
                    breaches.push(TeacherBreach {
                        course_id: section.course.id.clone(),
                        section_id: section.section.clone(),
                        required_teacher: required.clone(),
                        assigned_teacher: assigned.clone(),
                        slot: a.slot(),
                    });
                }
            }
        }
        if slot_count > 0 {
            for usage in &mut room_usage {
                usage.occupancy = usage.occupied_hours as f64 / slot_count as f64;
            }
        }

        let sections = catalog.sections();
        let unfilled_hours = (0..sections.len())
            .map(|s| schedule.hours_remaining(s))
            .sum();
        let complete = (0..sections.len())
            .filter(|&s| schedule.hours_remaining(s) == 0)
            .count();
        let completion_rate = if sections.is_empty() {
            1.0
        } else {
            complete as f64 / sections.len() as f64
        };

        Self {
            assignments: schedule.len(),
            teacher_loads,
            room_usage,
            unfilled_hours,
            completion_rate,
            breaches,
        }
    }

    /// Quota teachers still below the minimum load, with their hours.
    pub fn quota_shortfalls(&self) -> Vec<(&str, u32)> {
        self.teacher_loads
            .iter()
            .filter(|l| l.has_quota && !l.quota_met)
            .map(|l| (l.teacher_id.as_str(), l.hours))
            .collect()
    }

    /// Total gaps across all teachers.
    pub fn total_gaps(&self) -> u32 {
        self.teacher_loads.iter().map(|l| l.gaps).sum()
    }

    /// Whether every section is fully placed.
    pub fn is_complete(&self) -> bool {
        self.unfilled_hours == 0
    }
}
