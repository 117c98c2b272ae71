//! Schedule (chromosome) model.
//!
//! A schedule is an ordered list of assignments plus three lookup indices
//! keyed by (teacher, day, period), (room, day, period) and
//! (section group, day, period). The indices mirror the assignment list
//! at all times and make every double-booking check O(1).
//!
//! # Invariants
//! - An index key is present iff some assignment occupies it.
//! - Each index key maps to exactly one assignment position.
//! - Hour counters equal the number of assignments per teacher / section.
//!
//! `add_assignment` is the conflict gate: it refuses any placement that
//! would double-book a teacher, room or section group. Mutation operators
//! edit assignments in place and call [`Schedule::rebuild_indices`]
//! afterwards.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", Sec. 2 (school timetabling)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::{Catalog, TimeSlot};

/// Index key: (entity index, day, period).
type SlotKey = (usize, usize, usize);

/// A placed (teacher, section, room, day, period) tuple.
///
/// Entities are referenced by catalog index. Two assignments are equal iff
/// they name the same teacher, course section, room, day and period, which
/// makes the value its own identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Teacher index in the catalog.
    pub teacher: usize,
    /// Course-section index in the catalog.
    pub section: usize,
    /// Room index in the catalog.
    pub room: usize,
    /// Day index.
    pub day: usize,
    /// Period index.
    pub period: usize,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(teacher: usize, section: usize, room: usize, day: usize, period: usize) -> Self {
        Self {
            teacher,
            section,
            room,
            day,
            period,
        }
    }

    /// The (day, period) coordinate.
    #[inline]
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.day, self.period)
    }

    /// Moves the assignment to another slot.
    #[inline]
    pub fn set_slot(&mut self, slot: TimeSlot) {
        self.day = slot.day;
        self.period = slot.period;
    }
}

/// Which entity a per-entity view is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixKind {
    /// Keyed by teacher ID.
    Teacher,
    /// Keyed by room ID.
    Room,
    /// Keyed by section (student group) ID.
    Section,
}

/// A candidate timetable.
#[derive(Debug, Clone)]
pub struct Schedule {
    catalog: Arc<Catalog>,
    assignments: Vec<Assignment>,
    by_teacher: HashMap<SlotKey, usize>,
    by_room: HashMap<SlotKey, usize>,
    by_group: HashMap<SlotKey, usize>,
    teacher_hours: Vec<u32>,
    section_hours: Vec<u32>,
    /// Fitness assigned by the evaluator (0 until evaluated).
    pub fitness: i64,
}

impl Schedule {
    /// Creates an empty schedule over a catalog.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let teachers = catalog.teachers().len();
        let sections = catalog.sections().len();
        Self {
            catalog,
            assignments: Vec::new(),
            by_teacher: HashMap::new(),
            by_room: HashMap::new(),
            by_group: HashMap::new(),
            teacher_hours: vec![0; teachers],
            section_hours: vec![0; sections],
            fitness: 0,
        }
    }

    /// The catalog this schedule refers to.
    #[inline]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Adds an assignment if it causes no double-booking.
    ///
    /// Returns `false` and leaves the schedule untouched when the teacher,
    /// room or section group is already busy in that slot, or when the
    /// assignment references an entity or slot outside the catalog.
    pub fn add_assignment(&mut self, assignment: Assignment) -> bool {
        if !self.fits(&assignment) || self.has_conflict(&assignment) {
            return false;
        }
        self.push_indexed(assignment);
        true
    }

    /// Appends an assignment without the conflict gate.
    ///
    /// Colliding index entries are overwritten, so the schedule may then
    /// hold double-bookings that only the evaluator's overlap rules see.
    /// Out-of-catalog assignments are still rejected.
    pub fn insert_unchecked(&mut self, assignment: Assignment) -> bool {
        if !self.fits(&assignment) {
            return false;
        }
        self.push_indexed(assignment);
        true
    }

    fn push_indexed(&mut self, a: Assignment) {
        let pos = self.assignments.len();
        self.assignments.push(a);
        self.index(pos, a);
        self.teacher_hours[a.teacher] += 1;
        self.section_hours[a.section] += 1;
    }

    fn index(&mut self, pos: usize, a: Assignment) {
        let group = self.catalog.section_group(a.section);
        self.by_teacher.insert((a.teacher, a.day, a.period), pos);
        self.by_room.insert((a.room, a.day, a.period), pos);
        self.by_group.insert((group, a.day, a.period), pos);
    }

    fn fits(&self, a: &Assignment) -> bool {
        fits_catalog(&self.catalog, a)
    }

    /// Whether the teacher is already busy at the assignment's slot.
    #[inline]
    pub fn has_teacher_conflict(&self, a: &Assignment) -> bool {
        self.by_teacher.contains_key(&(a.teacher, a.day, a.period))
    }

    /// Whether the room is already busy at the assignment's slot.
    #[inline]
    pub fn has_room_conflict(&self, a: &Assignment) -> bool {
        self.by_room.contains_key(&(a.room, a.day, a.period))
    }

    /// Whether the section group is already busy at the assignment's slot.
    pub fn has_section_conflict(&self, a: &Assignment) -> bool {
        if a.section >= self.catalog.sections().len() {
            return false;
        }
        let group = self.catalog.section_group(a.section);
        self.by_group.contains_key(&(group, a.day, a.period))
    }

    /// Whether any of the three conflict predicates holds.
    pub fn has_conflict(&self, a: &Assignment) -> bool {
        self.has_teacher_conflict(a) || self.has_room_conflict(a) || self.has_section_conflict(a)
    }

    /// Recomputes all indices and hour counters from the assignment list.
    ///
    /// Assignments that no longer reference a catalog entity or a slot of
    /// the week are dropped.
    pub fn rebuild_indices(&mut self) {
        let catalog = Arc::clone(&self.catalog);
        self.assignments.retain(|a| fits_catalog(&catalog, a));
        self.by_teacher.clear();
        self.by_room.clear();
        self.by_group.clear();
        self.teacher_hours.iter_mut().for_each(|h| *h = 0);
        self.section_hours.iter_mut().for_each(|h| *h = 0);

        for pos in 0..self.assignments.len() {
            let a = self.assignments[pos];
            self.index(pos, a);
            self.teacher_hours[a.teacher] += 1;
            self.section_hours[a.section] += 1;
        }
    }

    /// All assignments in insertion order.
    #[inline]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Mutable access to one assignment.
    ///
    /// Indices are stale after any edit of day, period or room until
    /// [`Schedule::rebuild_indices`] is called.
    pub(crate) fn assignment_mut(&mut self, pos: usize) -> Option<&mut Assignment> {
        self.assignments.get_mut(pos)
    }

    /// Number of assignments.
    #[inline]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the schedule has no assignments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Hours assigned to a teacher (by catalog index).
    pub fn teacher_hours(&self, teacher: usize) -> u32 {
        self.teacher_hours.get(teacher).copied().unwrap_or(0)
    }

    /// Hours placed for a section (by catalog index).
    pub fn section_hours(&self, section: usize) -> u32 {
        self.section_hours.get(section).copied().unwrap_or(0)
    }

    /// Hours still missing for a section.
    pub fn hours_remaining(&self, section: usize) -> u32 {
        self.catalog
            .section(section)
            .hours_remaining(self.section_hours(section))
    }

    /// The assignment occupying an entity's slot, if any.
    ///
    /// `entity` is a teacher, room or group index depending on `kind`.
    pub fn occupant(&self, kind: MatrixKind, entity: usize, slot: TimeSlot) -> Option<&Assignment> {
        self.occupant_pos(kind, entity, slot)
            .and_then(|pos| self.assignments.get(pos))
    }

    /// Position of the assignment occupying an entity's slot, if any.
    pub fn occupant_pos(&self, kind: MatrixKind, entity: usize, slot: TimeSlot) -> Option<usize> {
        let key = (entity, slot.day, slot.period);
        match kind {
            MatrixKind::Teacher => self.by_teacher.get(&key),
            MatrixKind::Room => self.by_room.get(&key),
            MatrixKind::Section => self.by_group.get(&key),
        }
        .copied()
    }

    /// Entity index an assignment contributes to for a given view.
    #[inline]
    pub fn entity_of(&self, kind: MatrixKind, a: &Assignment) -> usize {
        match kind {
            MatrixKind::Teacher => a.teacher,
            MatrixKind::Room => a.room,
            MatrixKind::Section => self.catalog.section_group(a.section),
        }
    }

    fn entity_idx(&self, kind: MatrixKind, id: &str) -> Option<usize> {
        match kind {
            MatrixKind::Teacher => self.catalog.teacher_idx(id),
            MatrixKind::Room => self.catalog.room_idx(id),
            MatrixKind::Section => self.catalog.group_idx(id),
        }
    }

    /// Number of free periods strictly between busy periods of a teacher,
    /// summed over all days. Unknown IDs yield 0.
    pub fn gap_count(&self, teacher_id: &str) -> u32 {
        self.catalog
            .teacher_idx(teacher_id)
            .map_or(0, |t| self.teacher_gaps(t))
    }

    /// [`Schedule::gap_count`] by teacher index.
    pub fn teacher_gaps(&self, teacher: usize) -> u32 {
        let mut periods_by_day: Vec<Vec<usize>> = vec![Vec::new(); self.catalog.layout().days];
        for a in self.assignments.iter().filter(|a| a.teacher == teacher) {
            periods_by_day[a.day].push(a.period);
        }

        periods_by_day
            .iter_mut()
            .filter(|periods| periods.len() >= 2)
            .map(|periods| {
                periods.sort_unstable();
                periods
                    .windows(2)
                    .map(|w| w[1].saturating_sub(w[0]).saturating_sub(1) as u32)
                    .sum::<u32>()
            })
            .sum()
    }

    /// Assignments per day for a teacher.
    pub fn daily_load(&self, teacher: usize) -> Vec<u32> {
        let mut load = vec![0u32; self.catalog.layout().days];
        for a in self.assignments.iter().filter(|a| a.teacher == teacher) {
            load[a.day] += 1;
        }
        load
    }

    /// Day × period grid of the assignments of one teacher, room or group.
    ///
    /// Cells are `None` where the entity is free. Unknown IDs give an
    /// empty grid.
    pub fn matrix_for(&self, kind: MatrixKind, id: &str) -> Vec<Vec<Option<&Assignment>>> {
        let mut grid = self.catalog.layout().empty_grid();
        let Some(entity) = self.entity_idx(kind, id) else {
            return grid;
        };
        for a in &self.assignments {
            if self.entity_of(kind, a) == entity {
                grid[a.day][a.period] = Some(a);
            }
        }
        grid
    }

    /// Teacher indices that appear in at least one assignment.
    pub fn active_teachers(&self) -> Vec<usize> {
        (0..self.teacher_hours.len())
            .filter(|&t| self.teacher_hours[t] > 0)
            .collect()
    }
}

fn fits_catalog(catalog: &Catalog, a: &Assignment) -> bool {
    a.teacher < catalog.teachers().len()
        && a.room < catalog.rooms().len()
        && a.section < catalog.sections().len()
        && catalog.layout().contains(a.slot())
}
