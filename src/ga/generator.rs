//! Initial population construction.
//!
//! Two strategies build a [`Schedule`] section by section, largest weekly
//! load first:
//!
//! - **Random**: draws random (room, day, period) triples per section until
//!   the section is complete or the attempt budget runs out.
//! - **Heuristic**: for each missing hour, samples candidate placements and
//!   commits the best by a local score (fewer isolated gaps, consecutive
//!   sessions of the same course, lighter days). Sections with a mandated
//!   teacher go first.
//!
//! Both strategies are best-effort. Sections may end up short, and the
//! result is only judged by the evaluator.
//!
//! # Reference
//! Colorni, Dorigo & Maniezzo (1992), "A Genetic Algorithm to Solve the
//! Timetable Problem"

use std::cmp::Reverse;
use std::sync::Arc;

use log::debug;
use rand::Rng;
use rand::prelude::IndexedRandom;

use crate::models::{Assignment, Catalog, MatrixKind, Schedule, TeacherChoice, TimeSlot};

/// Random draws per section in the random strategy.
pub const RANDOM_ATTEMPTS_PER_SECTION: usize = 100;

/// Candidates sampled per hour in the heuristic strategy.
pub const HEURISTIC_SAMPLES_PER_HOUR: usize = 50;

const GAP_PENALTY: i32 = -10;
const ADJACENT_BONUS: i32 = 5;
const LIGHT_DAY_BONUS: i32 = 3;

/// Builds initial schedules over a catalog.
#[derive(Debug, Clone)]
pub struct ScheduleGenerator {
    catalog: Arc<Catalog>,
}

impl ScheduleGenerator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Unguided random placement.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Schedule {
        let mut schedule = Schedule::new(Arc::clone(&self.catalog));
        let layout = self.catalog.layout();

        for section in self.section_order(false) {
            let Some(teacher) = self.pick_teacher(&schedule, section) else {
                continue;
            };
            let rooms = self.catalog.suitable_rooms(section);
            let profile = self.catalog.teacher(teacher);

            let mut attempts = 0;
            while schedule.hours_remaining(section) > 0 && attempts < RANDOM_ATTEMPTS_PER_SECTION {
                attempts += 1;
                let Some(&room) = rooms.choose(rng) else {
                    break;
                };
                let day = rng.random_range(0..layout.days);
                let period = rng.random_range(0..layout.periods);
                if !profile.is_available(day, period) {
                    continue;
                }
                schedule.add_assignment(Assignment::new(teacher, section, room, day, period));
            }

            if schedule.hours_remaining(section) > 0 {
                debug!(
                    "random: section {:?} left {} hour(s) short",
                    self.catalog.section(section).key(),
                    schedule.hours_remaining(section)
                );
            }
        }
        schedule
    }

    /// Greedy placement scored by gaps, adjacency and daily balance.
    pub fn heuristic<R: Rng>(&self, rng: &mut R) -> Schedule {
        let mut schedule = Schedule::new(Arc::clone(&self.catalog));
        let layout = self.catalog.layout();

        for section in self.section_order(true) {
            let Some(teacher) = self.pick_teacher(&schedule, section) else {
                continue;
            };
            let rooms = self.catalog.suitable_rooms(section);
            let profile = self.catalog.teacher(teacher);

            for _ in 0..schedule.hours_remaining(section) {
                let day_counts = schedule.daily_load(teacher);
                let mut best: Option<(i32, Assignment)> = None;

                for _ in 0..HEURISTIC_SAMPLES_PER_HOUR {
                    let Some(&room) = rooms.choose(rng) else {
                        break;
                    };
                    let day = rng.random_range(0..layout.days);
                    let period = rng.random_range(0..layout.periods);
                    if !profile.is_available(day, period) {
                        continue;
                    }
                    let candidate = Assignment::new(teacher, section, room, day, period);
                    if schedule.has_conflict(&candidate) {
                        continue;
                    }
                    let score = placement_score(&schedule, &candidate, &day_counts);
                    if best.map_or(true, |(top, _)| score > top) {
                        best = Some((score, candidate));
                    }
                }

                match best {
                    Some((_, a)) => {
                        schedule.add_assignment(a);
                    }
                    None => debug!(
                        "heuristic: abandoned one hour of section {:?}",
                        self.catalog.section(section).key()
                    ),
                }
            }
        }
        schedule
    }

    /// Placeable sections by descending weekly hours (stable).
    ///
    /// With `mandated_first`, sections naming a specific teacher lead.
    fn section_order(&self, mandated_first: bool) -> Vec<usize> {
        let sections = self.catalog.sections();
        let mut order: Vec<usize> = (0..sections.len())
            .filter(|&s| self.catalog.is_placeable(s))
            .collect();
        order.sort_by_key(|&s| Reverse(sections[s].weekly_hours()));
        if mandated_first {
            order.sort_by_key(|&s| sections[s].required_teacher.is_none());
        }
        order
    }

    /// Mandated teacher, else the eligible teacher with the fewest hours in
    /// this schedule, ties going to quota teachers still short of hours.
    fn pick_teacher(&self, schedule: &Schedule, section: usize) -> Option<usize> {
        match self.catalog.teacher_choice(section)? {
            TeacherChoice::Required(t) => Some(*t),
            TeacherChoice::Eligible(candidates) => candidates.iter().copied().min_by_key(|&t| {
                let hours = schedule.teacher_hours(t);
                (hours, !self.catalog.teacher(t).needs_hours(hours))
            }),
        }
    }
}

/// Local desirability of placing `a` given the teacher's current day.
///
/// `day_counts` is the teacher's per-day load before the placement.
fn placement_score(schedule: &Schedule, a: &Assignment, day_counts: &[u32]) -> i32 {
    let periods = schedule.catalog().layout().periods;
    let neighbour = |period: usize| {
        schedule.occupant(MatrixKind::Teacher, a.teacher, TimeSlot::new(a.day, period))
    };
    let before = a.period.checked_sub(1).and_then(neighbour);
    let after = (a.period + 1 < periods).then(|| neighbour(a.period + 1)).flatten();

    let mut score = 0;

    let inner = a.period > 0 && a.period + 1 < periods;
    if inner && before.is_none() && after.is_none() && day_counts[a.day] > 0 {
        score += GAP_PENALTY;
    }

    let course = &schedule.catalog().section(a.section).course.id;
    for n in [before, after].into_iter().flatten() {
        if schedule.catalog().section(n.section).course.id == *course {
            score += ADJACENT_BONUS;
        }
    }

    let min = day_counts.iter().copied().min().unwrap_or(0);
    let max = day_counts.iter().copied().max().unwrap_or(0);
    if min < max && day_counts[a.day] == min {
        score += LIGHT_DAY_BONUS;
    }

    score
}
