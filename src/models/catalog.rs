//! Shared entity table.
//!
//! The catalog owns every teacher, room and course section of a problem
//! instance. Schedules refer to entities by index into the catalog and
//! share it through an `Arc`, so cloning a schedule never copies entities.
//!
//! On construction the catalog resolves, per section, which teachers may
//! take it and which rooms can host it. Sections that cannot be placed at
//! all are recorded as [`SkippedSection`]s.

use serde::Serialize;
use std::collections::HashMap;

use super::{CourseSection, Room, Teacher, WeekLayout};
use crate::validation::{validate_input, ValidationError};

/// Teacher resolution for a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeacherChoice {
    /// The section mandates this teacher.
    Required(usize),
    /// Any of these teachers may teach the section.
    Eligible(Vec<usize>),
}

/// Why a section cannot be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The mandated teacher is not in the catalog.
    RequiredTeacherMissing,
    /// No teacher lists the course.
    NoEligibleTeacher,
    /// No room satisfies the course level and equipment.
    NoSuitableRoom,
}

/// A section the generator will never place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSection {
    /// Course ID.
    pub course_id: String,
    /// Section (group) ID.
    pub section_id: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
struct SectionPlan {
    teachers: Option<TeacherChoice>,
    rooms: Vec<usize>,
    group: usize,
}

/// Immutable table of teachers, rooms and course sections.
#[derive(Debug, Clone)]
pub struct Catalog {
    layout: WeekLayout,
    teachers: Vec<Teacher>,
    rooms: Vec<Room>,
    sections: Vec<CourseSection>,
    teacher_index: HashMap<String, usize>,
    room_index: HashMap<String, usize>,
    group_index: HashMap<String, usize>,
    groups: Vec<String>,
    plans: Vec<SectionPlan>,
    skipped: Vec<SkippedSection>,
}

impl Catalog {
    /// Builds a catalog after validating the input.
    ///
    /// # Errors
    /// Returns every structural problem found by [`validate_input`].
    pub fn new(
        teachers: Vec<Teacher>,
        sections: Vec<CourseSection>,
        rooms: Vec<Room>,
        layout: WeekLayout,
    ) -> Result<Self, Vec<ValidationError>> {
        validate_input(&teachers, &sections, &rooms, layout)?;

        let teacher_index: HashMap<String, usize> = teachers
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        let room_index: HashMap<String, usize> = rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        let mut group_index: HashMap<String, usize> = HashMap::new();
        let mut groups = Vec::new();
        let mut plans = Vec::with_capacity(sections.len());
        let mut skipped = Vec::new();

        for section in &sections {
            let group = *group_index.entry(section.section.clone()).or_insert_with(|| {
                groups.push(section.section.clone());
                groups.len() - 1
            });

            let course = &section.course;
            let room_candidates: Vec<usize> = rooms
                .iter()
                .enumerate()
                .filter(|(_, r)| r.suits_level(&course.level) && r.has_equipment(&course.equipment))
                .map(|(i, _)| i)
                .collect();

            let teacher_choice = match &section.required_teacher {
                Some(id) => teacher_index.get(id).map(|&i| TeacherChoice::Required(i)),
                None => {
                    let eligible: Vec<usize> = teachers
                        .iter()
                        .enumerate()
                        .filter(|(_, t)| t.can_teach(&course.id))
                        .map(|(i, _)| i)
                        .collect();
                    (!eligible.is_empty()).then_some(TeacherChoice::Eligible(eligible))
                }
            };

            let reason = match (&teacher_choice, &section.required_teacher) {
                (None, Some(_)) => Some(SkipReason::RequiredTeacherMissing),
                (None, None) => Some(SkipReason::NoEligibleTeacher),
                _ if room_candidates.is_empty() => Some(SkipReason::NoSuitableRoom),
                _ => None,
            };
            if let Some(reason) = reason {
                skipped.push(SkippedSection {
                    course_id: course.id.clone(),
                    section_id: section.section.clone(),
                    reason,
                });
            }

            plans.push(SectionPlan {
                teachers: teacher_choice,
                rooms: room_candidates,
                group,
            });
        }

        Ok(Self {
            layout,
            teachers,
            rooms,
            sections,
            teacher_index,
            room_index,
            group_index,
            groups,
            plans,
            skipped,
        })
    }

    /// Week layout shared by every schedule of this catalog.
    #[inline]
    pub fn layout(&self) -> WeekLayout {
        self.layout
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn sections(&self) -> &[CourseSection] {
        &self.sections
    }

    #[inline]
    pub fn teacher(&self, idx: usize) -> &Teacher {
        &self.teachers[idx]
    }

    #[inline]
    pub fn room(&self, idx: usize) -> &Room {
        &self.rooms[idx]
    }

    #[inline]
    pub fn section(&self, idx: usize) -> &CourseSection {
        &self.sections[idx]
    }

    /// Index of a teacher by ID.
    pub fn teacher_idx(&self, id: &str) -> Option<usize> {
        self.teacher_index.get(id).copied()
    }

    /// Index of a room by ID.
    pub fn room_idx(&self, id: &str) -> Option<usize> {
        self.room_index.get(id).copied()
    }

    /// Index of a section group (student group) by its section ID.
    pub fn group_idx(&self, section_id: &str) -> Option<usize> {
        self.group_index.get(section_id).copied()
    }

    /// Section ID of an interned group.
    pub fn group_id(&self, group: usize) -> &str {
        &self.groups[group]
    }

    /// Number of distinct student groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Group index of a course section.
    #[inline]
    pub fn section_group(&self, section: usize) -> usize {
        self.plans[section].group
    }

    /// Resolved teacher candidates for a section. `None` if none exist.
    pub fn teacher_choice(&self, section: usize) -> Option<&TeacherChoice> {
        self.plans[section].teachers.as_ref()
    }

    /// Rooms whose level and equipment suit a section.
    pub fn suitable_rooms(&self, section: usize) -> &[usize] {
        &self.plans[section].rooms
    }

    /// Whether the generator can place a section at all.
    pub fn is_placeable(&self, section: usize) -> bool {
        self.plans[section].teachers.is_some() && !self.plans[section].rooms.is_empty()
    }

    /// Sections the generator will skip, with reasons.
    pub fn skipped_sections(&self) -> &[SkippedSection] {
        &self.skipped
    }

    /// Total weekly hours demanded by all sections.
    pub fn demanded_hours(&self) -> u32 {
        self.sections.iter().map(|s| s.weekly_hours()).sum()
    }
}
