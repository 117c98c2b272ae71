//! Configurable genetic operators for timetabling.
//!
//! Provides runtime-selectable crossover strategies and the composite
//! mutation via [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::{CrossoverType, GeneticOperators};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossovers, CrossoverType::ALL.to_vec());
//! assert_eq!(ops.mutation.operators.len(), 3);
//! ```

use rand::Rng;
use rand::prelude::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::crossover::{day_swap_crossover, event_subset_crossover, section_swap_crossover};
use super::mutation::CompositeMutation;
use super::GaConfig;
use crate::models::Schedule;

/// Crossover strategy for timetables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossoverType {
    /// Exchange whole days.
    DaySwap,
    /// Exchange random subsets of assignments.
    EventSubset,
    /// Exchange every assignment of chosen course sections.
    SectionSwap,
}

impl CrossoverType {
    /// All strategies.
    pub const ALL: [CrossoverType; 3] = [
        CrossoverType::DaySwap,
        CrossoverType::EventSubset,
        CrossoverType::SectionSwap,
    ];

    /// Applies this strategy.
    pub fn apply<R: Rng>(
        &self,
        p1: &Schedule,
        p2: &Schedule,
        rng: &mut R,
    ) -> (Schedule, Schedule) {
        match self {
            CrossoverType::DaySwap => day_swap_crossover(p1, p2, rng),
            CrossoverType::EventSubset => event_subset_crossover(p1, p2, rng),
            CrossoverType::SectionSwap => section_swap_crossover(p1, p2, rng),
        }
    }
}

/// Runtime-selectable genetic operators for the timetabling GA.
///
/// One crossover strategy is drawn uniformly per recombination; mutation
/// goes through a [`CompositeMutation`].
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Crossover strategies to draw from.
    pub crossovers: Vec<CrossoverType>,
    /// Mutation applied to every child.
    pub mutation: CompositeMutation,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self::from_config(&GaConfig::default())
    }
}

impl GeneticOperators {
    /// Operators described by a configuration.
    pub fn from_config(config: &GaConfig) -> Self {
        Self {
            crossovers: config.crossovers.clone(),
            mutation: CompositeMutation::standard(config.mutation_probability),
        }
    }

    /// Recombines two parents with a randomly drawn strategy.
    ///
    /// Falls back to copies of the parents when no strategy is configured.
    pub fn crossover<R: Rng>(
        &self,
        p1: &Schedule,
        p2: &Schedule,
        rng: &mut R,
    ) -> (Schedule, Schedule) {
        match self.crossovers.choose(rng) {
            Some(kind) => kind.apply(p1, p2, rng),
            None => (p1.clone(), p2.clone()),
        }
    }

    /// Mutates a schedule in place.
    pub fn mutate<R: Rng>(&self, schedule: &mut Schedule, rng: &mut R) -> bool {
        self.mutation.mutate(schedule, rng)
    }
}
