//! Genetic search over weekly timetables.
//!
//! Individuals are whole [`Schedule`](crate::models::Schedule)s: lists of
//! placed class hours with their conflict indices. Children are rebuilt
//! through the conflict-checked insertion path, so recombination never
//! introduces double bookings. Mutations only apply moves that keep the
//! schedule conflict-free.
//!
//! # Submodules
//!
//! - [`operators`]: Runtime-selectable crossover strategies and mutation
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - Miller & Goldberg (1995), "Genetic Algorithms, Tournament Selection, and the
//!   Effects of Noise"

mod config;
mod crossover;
mod engine;
mod generator;
mod mutation;
pub mod operators;

pub use config::{ConfigError, GaConfig};
pub use crossover::{
    EVENT_CUT_MAX, EVENT_CUT_MIN, day_swap_crossover, event_subset_crossover,
    section_swap_crossover,
};
pub use engine::{GeneticEngine, RunResult, RunStatistics, StopReason};
pub use generator::{HEURISTIC_SAMPLES_PER_HOUR, RANDOM_ATTEMPTS_PER_SECTION, ScheduleGenerator};
pub use mutation::{
    CompositeMutation, MutationKind, MutationOperator, reschedule_slot_mutation,
    room_reassign_mutation, swap_slots_mutation,
};
pub use operators::{CrossoverType, GeneticOperators};
