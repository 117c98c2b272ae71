//! Mutation operators for timetables.
//!
//! Mutations edit a schedule in place and report whether anything changed.
//! A rejected proposal leaves the schedule untouched and is not retried.
//! Every accepted edit is followed by [`Schedule::rebuild_indices`].

use rand::Rng;
use rand::prelude::IndexedRandom;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

use crate::models::{Assignment, MatrixKind, Schedule, TimeSlot};

/// Mutation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    /// Move one assignment to a random slot.
    RescheduleSlot,
    /// Move one assignment to another suitable room.
    RoomReassign,
    /// Exchange the slots of two assignments.
    SwapSlots,
}

/// A mutation strategy with its activation probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationOperator {
    pub kind: MutationKind,
    pub probability: f64,
}

impl MutationOperator {
    pub fn new(kind: MutationKind, probability: f64) -> Self {
        Self { kind, probability }
    }

    /// Applies the mutation with the configured probability.
    pub fn mutate<R: Rng>(&self, schedule: &mut Schedule, rng: &mut R) -> bool {
        if rng.random::<f64>() < self.probability {
            self.apply(schedule, rng)
        } else {
            false
        }
    }

    /// Applies the mutation unconditionally.
    pub fn apply<R: Rng>(&self, schedule: &mut Schedule, rng: &mut R) -> bool {
        match self.kind {
            MutationKind::RescheduleSlot => reschedule_slot_mutation(schedule, rng),
            MutationKind::RoomReassign => room_reassign_mutation(schedule, rng),
            MutationKind::SwapSlots => swap_slots_mutation(schedule, rng),
        }
    }
}

/// Always activates and delegates to one randomly chosen operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeMutation {
    pub operators: Vec<MutationOperator>,
}

impl CompositeMutation {
    pub fn new(operators: Vec<MutationOperator>) -> Self {
        Self { operators }
    }

    /// RescheduleSlot at `p`, RoomReassign and SwapSlots at `p / 2`.
    pub fn standard(p: f64) -> Self {
        Self::new(vec![
            MutationOperator::new(MutationKind::RescheduleSlot, p),
            MutationOperator::new(MutationKind::RoomReassign, p / 2.0),
            MutationOperator::new(MutationKind::SwapSlots, p / 2.0),
        ])
    }

    pub fn mutate<R: Rng>(&self, schedule: &mut Schedule, rng: &mut R) -> bool {
        match self.operators.choose(rng) {
            Some(op) => op.mutate(schedule, rng),
            None => false,
        }
    }
}

fn teacher_free_at(schedule: &Schedule, a: &Assignment, slot: TimeSlot) -> bool {
    schedule
        .catalog()
        .teacher(a.teacher)
        .is_available(slot.day, slot.period)
}

/// Moves a random assignment to a random (day, period).
///
/// Rejected when the slot is unchanged, the teacher is unavailable there,
/// or the teacher, room or section group is already busy.
pub fn reschedule_slot_mutation<R: Rng>(schedule: &mut Schedule, rng: &mut R) -> bool {
    if schedule.is_empty() {
        return false;
    }
    let layout = schedule.catalog().layout();
    let pos = rng.random_range(0..schedule.len());
    let current = schedule.assignments()[pos];

    let slot = TimeSlot::new(
        rng.random_range(0..layout.days),
        rng.random_range(0..layout.periods),
    );
    if slot == current.slot() {
        return false;
    }

    let mut proposal = current;
    proposal.set_slot(slot);
    if !teacher_free_at(schedule, &current, slot) || schedule.has_conflict(&proposal) {
        return false;
    }

    if let Some(a) = schedule.assignment_mut(pos) {
        a.set_slot(slot);
    }
    schedule.rebuild_indices();
    true
}

/// Moves a random assignment to a different suitable room.
pub fn room_reassign_mutation<R: Rng>(schedule: &mut Schedule, rng: &mut R) -> bool {
    if schedule.is_empty() {
        return false;
    }
    let pos = rng.random_range(0..schedule.len());
    let current = schedule.assignments()[pos];

    let others: Vec<usize> = schedule
        .catalog()
        .suitable_rooms(current.section)
        .iter()
        .copied()
        .filter(|&r| r != current.room)
        .collect();
    let Some(&room) = others.choose(rng) else {
        return false;
    };

    let proposal = Assignment { room, ..current };
    if schedule.has_room_conflict(&proposal) {
        return false;
    }

    if let Some(a) = schedule.assignment_mut(pos) {
        a.room = room;
    }
    schedule.rebuild_indices();
    true
}

/// Exchanges the (day, period) of two distinct random assignments.
///
/// Each moved assignment must find its teacher, room and section group
/// free at the new slot, apart from the partner it swaps with. Two classes
/// sharing a teacher, room or group can therefore trade slots; checking
/// both targets against the pre-swap indices would reject such swaps even
/// though the result is conflict-free.
pub fn swap_slots_mutation<R: Rng>(schedule: &mut Schedule, rng: &mut R) -> bool {
    if schedule.len() < 2 {
        return false;
    }
    let picked = sample(rng, schedule.len(), 2);
    let (i, j) = (picked.index(0), picked.index(1));
    let (a, b) = (schedule.assignments()[i], schedule.assignments()[j]);
    // Same slot, or same class in two slots: swapping changes nothing.
    if a.slot() == b.slot() || (a.teacher, a.section, a.room) == (b.teacher, b.section, b.room) {
        return false;
    }

    let lands = |moved: &Assignment, target: TimeSlot| {
        teacher_free_at(schedule, moved, target)
            && [MatrixKind::Teacher, MatrixKind::Room, MatrixKind::Section]
                .into_iter()
                .all(|kind| {
                    let entity = schedule.entity_of(kind, moved);
                    match schedule.occupant_pos(kind, entity, target) {
                        None => true,
                        Some(p) => p == i || p == j,
                    }
                })
    };
    if !lands(&a, b.slot()) || !lands(&b, a.slot()) {
        return false;
    }

    if let Some(x) = schedule.assignment_mut(i) {
        x.set_slot(b.slot());
    }
    if let Some(y) = schedule.assignment_mut(j) {
        y.set_slot(a.slot());
    }
    schedule.rebuild_indices();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Catalog, Constraint, Course, CourseSection, Level, Room, Teacher, WeekLayout};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::sync::Arc;

    fn catalog() -> Arc<Catalog> {
        let teachers = vec![
            Teacher::new("T1").with_course("MATH"),
            Teacher::new("T2").with_course("LANG"),
        ];
        let sections = vec![
            CourseSection::new(Course::new("MATH", Level::Primary, 4), "A"),
            CourseSection::new(Course::new("LANG", Level::Primary, 4), "B"),
        ];
        let rooms = vec![
            Room::new("R1", Level::All),
            Room::new("R2", Level::All),
            Room::new("R3", Level::All),
        ];
        Arc::new(Catalog::new(teachers, sections, rooms, WeekLayout::new(4)).unwrap())
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new(catalog());
        s.add_assignment(Assignment::new(0, 0, 0, 0, 0));
        s.add_assignment(Assignment::new(0, 0, 0, 1, 1));
        s.add_assignment(Assignment::new(1, 1, 1, 0, 0));
        s.add_assignment(Assignment::new(1, 1, 1, 2, 3));
        s
    }

    fn conflict_free(s: &Schedule) -> bool {
        [
            Constraint::TeacherNoOverlap,
            Constraint::RoomNoOverlap,
            Constraint::SectionNoOverlap,
        ]
        .iter()
        .all(|c| c.evaluate(s) == 0)
    }

    #[test]
    fn test_empty_schedule_never_mutates() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut s = Schedule::new(catalog());
        assert!(!reschedule_slot_mutation(&mut s, &mut rng));
        assert!(!room_reassign_mutation(&mut s, &mut rng));
        assert!(!swap_slots_mutation(&mut s, &mut rng));
    }

    #[test]
    fn test_reschedule_keeps_feasibility() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut s = sample_schedule();
        let mut changed = 0;
        for _ in 0..200 {
            let before = s.assignments().to_vec();
            if reschedule_slot_mutation(&mut s, &mut rng) {
                changed += 1;
                assert_ne!(s.assignments(), &before[..]);
            } else {
                assert_eq!(s.assignments(), &before[..]);
            }
            assert!(conflict_free(&s));
            assert_eq!(s.len(), 4);
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_room_reassign_uses_suitable_rooms() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut s = sample_schedule();
        let mut changed = false;
        for _ in 0..50 {
            changed |= room_reassign_mutation(&mut s, &mut rng);
            assert!(conflict_free(&s));
        }
        assert!(changed);
        let slots: Vec<_> = s.assignments().iter().map(|a| a.slot()).collect();
        assert_eq!(
            slots,
            sample_schedule().assignments().iter().map(|a| a.slot()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_room_reassign_without_alternative() {
        let cat = Catalog::new(
            vec![Teacher::new("T1").with_course("MATH")],
            vec![CourseSection::new(Course::new("MATH", Level::Primary, 1), "A")],
            vec![Room::new("R1", Level::All)],
            WeekLayout::new(4),
        )
        .unwrap();
        let mut s = Schedule::new(Arc::new(cat));
        s.add_assignment(Assignment::new(0, 0, 0, 0, 0));
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(!room_reassign_mutation(&mut s, &mut rng));
    }

    #[test]
    fn test_room_reassign_rejects_busy_room() {
        // Each class's only alternative room is taken by the other class.
        let cat = Catalog::new(
            vec![
                Teacher::new("T1").with_course("MATH"),
                Teacher::new("T2").with_course("LANG"),
            ],
            vec![
                CourseSection::new(Course::new("MATH", Level::Primary, 1), "A"),
                CourseSection::new(Course::new("LANG", Level::Primary, 1), "B"),
            ],
            vec![Room::new("R1", Level::All), Room::new("R2", Level::All)],
            WeekLayout::new(4),
        )
        .unwrap();
        let mut s = Schedule::new(Arc::new(cat));
        assert!(s.add_assignment(Assignment::new(0, 0, 0, 2, 1)));
        assert!(s.add_assignment(Assignment::new(1, 1, 1, 2, 1)));
        let before = s.assignments().to_vec();

        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            assert!(!room_reassign_mutation(&mut s, &mut rng));
            assert_eq!(s.assignments(), &before[..]);
        }
    }

    #[test]
    fn test_reschedule_to_same_slot_is_noop() {
        // One period per day: a move fails only when it draws the current day.
        let cat = Catalog::new(
            vec![Teacher::new("T1").with_course("MATH")],
            vec![CourseSection::new(Course::new("MATH", Level::Primary, 1), "A")],
            vec![Room::new("R1", Level::All)],
            WeekLayout::new(1),
        )
        .unwrap();
        let mut template = Schedule::new(Arc::new(cat));
        assert!(template.add_assignment(Assignment::new(0, 0, 0, 2, 0)));

        let mut rejected = 0;
        for seed in 0..100 {
            let mut s = template.clone();
            let mut rng = SmallRng::seed_from_u64(seed);
            if reschedule_slot_mutation(&mut s, &mut rng) {
                assert_ne!(s.assignments()[0].slot(), TimeSlot::new(2, 0));
            } else {
                rejected += 1;
                assert_eq!(s.assignments(), template.assignments());
            }
            assert_eq!(s.len(), 1);
        }
        assert!(rejected > 0);
        assert!(rejected < 100);
    }

    #[test]
    fn test_swap_keeps_feasibility() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut s = sample_schedule();
        let mut changed = false;
        for _ in 0..100 {
            changed |= swap_slots_mutation(&mut s, &mut rng);
            assert!(conflict_free(&s));
        }
        assert!(changed);
    }

    #[test]
    fn test_swap_partner_is_not_a_conflict() {
        // Same room and group; each lands on the other's freed slot.
        let mut s = Schedule::new(catalog());
        s.add_assignment(Assignment::new(0, 0, 0, 0, 0));
        s.add_assignment(Assignment::new(1, 0, 0, 0, 1));
        let mut rng = SmallRng::seed_from_u64(3);
        assert!(swap_slots_mutation(&mut s, &mut rng));
        assert!(conflict_free(&s));
        assert_eq!(s.assignments()[0].slot(), TimeSlot::new(0, 1));
        assert_eq!(s.assignments()[1].slot(), TimeSlot::new(0, 0));
    }

    #[test]
    fn test_swap_blocked_by_third_assignment() {
        let mut s = Schedule::new(catalog());
        s.add_assignment(Assignment::new(0, 0, 0, 0, 0));
        let fixed = Assignment::new(1, 1, 1, 1, 1);
        s.add_assignment(fixed);
        // T1 also teaches at (1, 1), so the first class can never take the
        // fixed class's slot, and whichever T1 class sits at (0, 0) is
        // blocked from (1, 1) by the other.
        s.add_assignment(Assignment::new(0, 0, 2, 1, 1));

        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..100 {
            swap_slots_mutation(&mut s, &mut rng);
            assert!(conflict_free(&s));
            assert_eq!(s.assignments()[1], fixed);
        }
    }

    #[test]
    fn test_probability_zero_never_fires() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut s = sample_schedule();
        let op = MutationOperator::new(MutationKind::RescheduleSlot, 0.0);
        for _ in 0..50 {
            assert!(!op.mutate(&mut s, &mut rng));
        }
    }

    #[test]
    fn test_composite() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut s = sample_schedule();
        let composite = CompositeMutation::standard(1.0);
        assert_eq!(composite.operators.len(), 3);
        assert_eq!(composite.operators[1].probability, 0.5);

        let mut changed = false;
        for _ in 0..50 {
            changed |= composite.mutate(&mut s, &mut rng);
            assert!(conflict_free(&s));
        }
        assert!(changed);
        assert!(!CompositeMutation::new(vec![]).mutate(&mut s, &mut rng));
    }
}
