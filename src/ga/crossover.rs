//! Crossover operators for timetables.
//!
//! Each operator recombines two parents into two children. Children are
//! built through [`Schedule::add_assignment`], so a gene that collides
//! with one already inherited is dropped and a child may be shorter than
//! either parent. Parents are never modified.
//!
//! # Reference
//! Burke, Elliman & Weare (1995), "Specialised recombinative operators for
//! timetabling problems"

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use rand::seq::index::sample;

use crate::models::Schedule;

/// Lower bound of the EventSubset cut fraction.
pub const EVENT_CUT_MIN: f64 = 0.3;
/// Upper bound of the EventSubset cut fraction.
pub const EVENT_CUT_MAX: f64 = 0.7;

fn empty_like(parent: &Schedule) -> Schedule {
    Schedule::new(Arc::clone(parent.catalog()))
}

/// Day-swap crossover.
///
/// Picks a random non-empty proper subset of days. Child A takes `p1` on
/// the other days and `p2` on the chosen ones; child B is the complement.
pub fn day_swap_crossover<R: Rng>(
    p1: &Schedule,
    p2: &Schedule,
    rng: &mut R,
) -> (Schedule, Schedule) {
    let days = p1.catalog().layout().days;
    if days < 2 {
        return (p1.clone(), p2.clone());
    }

    let k = rng.random_range(1..days);
    let mut chosen = vec![false; days];
    for d in sample(rng, days, k) {
        chosen[d] = true;
    }

    let mut a = empty_like(p1);
    let mut b = empty_like(p1);
    for &gene in p1.assignments() {
        if chosen[gene.day] {
            b.add_assignment(gene);
        } else {
            a.add_assignment(gene);
        }
    }
    for &gene in p2.assignments() {
        if chosen[gene.day] {
            a.add_assignment(gene);
        } else {
            b.add_assignment(gene);
        }
    }
    (a, b)
}

/// Event-subset crossover.
///
/// Samples the same fraction (uniform in [0.3, 0.7]) of each parent's
/// assignments. Child A is `p2`'s sample followed by `p1` minus its sample;
/// child B mirrors it.
pub fn event_subset_crossover<R: Rng>(
    p1: &Schedule,
    p2: &Schedule,
    rng: &mut R,
) -> (Schedule, Schedule) {
    let cut = rng.random_range(EVENT_CUT_MIN..=EVENT_CUT_MAX);
    let n1 = (p1.len() as f64 * cut) as usize;
    let n2 = (p2.len() as f64 * cut) as usize;

    let picked1: Vec<_> = sample(rng, p1.len(), n1)
        .into_iter()
        .map(|i| p1.assignments()[i])
        .collect();
    let picked2: Vec<_> = sample(rng, p2.len(), n2)
        .into_iter()
        .map(|i| p2.assignments()[i])
        .collect();
    let keys1: HashSet<_> = picked1.iter().copied().collect();
    let keys2: HashSet<_> = picked2.iter().copied().collect();

    let mut a = empty_like(p1);
    for &gene in &picked2 {
        a.add_assignment(gene);
    }
    for gene in p1.assignments().iter().filter(|g| !keys1.contains(*g)) {
        a.add_assignment(*gene);
    }

    let mut b = empty_like(p1);
    for &gene in &picked1 {
        b.add_assignment(gene);
    }
    for gene in p2.assignments().iter().filter(|g| !keys2.contains(*g)) {
        b.add_assignment(*gene);
    }
    (a, b)
}

/// Section-swap crossover.
///
/// Exchanges every assignment of a random set of course sections. The set
/// holds between one and a third of the sections present in either parent.
/// With no sections at all, returns copies of the parents.
pub fn section_swap_crossover<R: Rng>(
    p1: &Schedule,
    p2: &Schedule,
    rng: &mut R,
) -> (Schedule, Schedule) {
    let mut union: Vec<usize> = p1
        .assignments()
        .iter()
        .chain(p2.assignments())
        .map(|g| g.section)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    if union.is_empty() {
        return (p1.clone(), p2.clone());
    }
    union.sort_unstable();

    let upper = (union.len() / 3).max(1);
    let k = rng.random_range(1..=upper);
    let swapped: HashSet<usize> = sample(rng, union.len(), k)
        .into_iter()
        .map(|i| union[i])
        .collect();

    let mut a = empty_like(p1);
    let mut b = empty_like(p1);
    for &gene in p1.assignments() {
        if swapped.contains(&gene.section) {
            b.add_assignment(gene);
        } else {
            a.add_assignment(gene);
        }
    }
    for &gene in p2.assignments() {
        if swapped.contains(&gene.section) {
            a.add_assignment(gene);
        } else {
            b.add_assignment(gene);
        }
    }
    (a, b)
}
