//! Generational genetic search over timetables.
//!
//! # Algorithm
//!
//! 1. Build the initial population: a share heuristically, the rest at
//!    random. Evaluate and sort by fitness (best first).
//! 2. Each generation copies the elite unchanged, then fills the rest by
//!    tournament selection, crossover (with the configured probability,
//!    otherwise copies of the parents) and the composite mutation.
//! 3. Re-evaluate, re-sort and update the best-ever individual. A strict
//!    improvement resets the stagnation counter.
//! 4. Stop when the best fitness reaches the target, the stagnation limit
//!    is hit, or `max_generations` have run.
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - Miller & Goldberg (1995), "Genetic Algorithms, Tournament Selection, and the
//!   Effects of Noise"

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::{SmallRng, StdRng};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use super::operators::GeneticOperators;
use super::{ConfigError, GaConfig, ScheduleGenerator};
use crate::evaluator::{EvaluationReport, Evaluator};
use crate::kpi::TimetableKpi;
use crate::models::{Catalog, Schedule, SkippedSection};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// Best fitness reached the target ratio of the ceiling.
    TargetReached,
    /// No improvement for `stagnation_limit` generations.
    Stagnation,
    /// `max_generations` were run.
    MaxGenerations,
}

/// Statistics of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStatistics {
    /// Generations evolved after the initial population.
    pub generations: usize,
    /// Fitness of the best schedule.
    pub best_fitness: i64,
    /// Best-ever fitness per generation, starting at generation 0.
    pub history: Vec<(usize, i64)>,
    /// Per-rule breakdown for the best schedule.
    pub report: EvaluationReport,
    /// Wall time of the run.
    pub elapsed: Duration,
    pub stop_reason: StopReason,
    pub generations_without_improvement: usize,
    /// Whether the best schedule satisfies every hard rule.
    pub is_valid: bool,
    /// Sections the generator could not place at all.
    pub skipped_sections: Vec<SkippedSection>,
}

/// Best schedule and run statistics.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub best: Schedule,
    pub stats: RunStatistics,
}

impl RunResult {
    /// Compliance indicators of the best schedule.
    pub fn kpi(&self) -> TimetableKpi {
        TimetableKpi::calculate(&self.best)
    }
}

/// Owns the population and drives generations.
pub struct GeneticEngine {
    catalog: Arc<Catalog>,
    config: GaConfig,
    evaluator: Evaluator,
    operators: GeneticOperators,
    generator: ScheduleGenerator,
    rng: StdRng,
    population: Vec<Schedule>,
    best: Option<Schedule>,
    generation: usize,
    generations_without_improvement: usize,
    history: Vec<(usize, i64)>,
}

impl GeneticEngine {
    /// Creates an engine over a catalog.
    ///
    /// # Errors
    /// Returns the first configuration problem found.
    pub fn new(catalog: Arc<Catalog>, config: GaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            evaluator: Evaluator::standard(&config.weights, config.base_fitness),
            operators: GeneticOperators::from_config(&config),
            generator: ScheduleGenerator::new(Arc::clone(&catalog)),
            catalog,
            config,
            rng,
            population: Vec::new(),
            best: None,
            generation: 0,
            generations_without_improvement: 0,
            history: Vec::new(),
        })
    }

    /// Current population, best first.
    pub fn population(&self) -> &[Schedule] {
        &self.population
    }

    /// Best schedule seen so far.
    pub fn best(&self) -> Option<&Schedule> {
        self.best.as_ref()
    }

    /// Generations evolved so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Builds and evaluates the initial population.
    ///
    /// Every individual gets its own RNG seeded from the engine RNG, so the
    /// result does not depend on whether construction runs in parallel.
    pub fn initialize(&mut self) {
        for skipped in self.catalog.skipped_sections() {
            warn!(
                "section {}/{} cannot be placed: {:?}",
                skipped.course_id, skipped.section_id, skipped.reason
            );
        }

        let size = self.config.population_size;
        let heuristic = self.config.heuristic_count();
        let seeds: Vec<u64> = (0..size).map(|_| self.rng.random()).collect();

        let generator = &self.generator;
        let build = |(i, seed): (usize, u64)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            if i < heuristic {
                generator.heuristic(&mut rng)
            } else {
                generator.random(&mut rng)
            }
        };
        self.population = if self.config.parallel {
            seeds.into_par_iter().enumerate().map(build).collect()
        } else {
            seeds.into_iter().enumerate().map(build).collect()
        };
        debug!(
            "initial population: {} heuristic, {} random",
            heuristic,
            size - heuristic
        );

        self.best = None;
        self.generation = 0;
        self.generations_without_improvement = 0;
        self.history.clear();
        self.evaluate_population();
        self.history.push((0, self.best_fitness()));
    }

    /// Produces and evaluates the next generation.
    pub fn evolve_generation(&mut self) {
        if self.population.is_empty() {
            self.initialize();
        }
        let size = self.config.population_size;
        let mut next: Vec<Schedule> = Vec::with_capacity(size);
        next.extend(self.population.iter().take(self.config.elitism).cloned());

        while next.len() < size {
            let i = tournament_select(&self.population, self.config.tournament_size, &mut self.rng);
            let j = tournament_select(&self.population, self.config.tournament_size, &mut self.rng);
            let (p1, p2) = (&self.population[i], &self.population[j]);

            let (c1, c2) = if self.rng.random::<f64>() < self.config.crossover_probability {
                self.operators.crossover(p1, p2, &mut self.rng)
            } else {
                (p1.clone(), p2.clone())
            };

            for mut child in [c1, c2] {
                if next.len() < size {
                    self.operators.mutate(&mut child, &mut self.rng);
                    next.push(child);
                }
            }
        }

        self.population = next;
        self.evaluate_population();
        self.generation += 1;
        self.history.push((self.generation, self.best_fitness()));
    }

    /// Runs the search to completion.
    ///
    /// Stop criteria are checked before every generation, generation 0
    /// included: when the initial population already reaches the target,
    /// no generation is evolved and `generations` is 0.
    pub fn run(&mut self) -> RunResult {
        let start = Instant::now();
        info!(
            "GA start: {} sections, population {}, max {} generations",
            self.catalog.sections().len(),
            self.config.population_size,
            self.config.max_generations
        );

        self.initialize();
        info!("initial best fitness: {}", self.best_fitness());

        let target = self.config.target_fitness();
        let stop_reason = loop {
            if self.best_fitness() as f64 >= target {
                break StopReason::TargetReached;
            }
            if self.config.stagnation_limit > 0
                && self.generations_without_improvement >= self.config.stagnation_limit
            {
                break StopReason::Stagnation;
            }
            if self.generation >= self.config.max_generations {
                break StopReason::MaxGenerations;
            }

            self.evolve_generation();

            if self.generation % 10 == 0 {
                info!(
                    "generation {}: best {}, average {:.2}, {:.2}s",
                    self.generation,
                    self.best_fitness(),
                    self.average_fitness(),
                    start.elapsed().as_secs_f64()
                );
            }
        };

        let elapsed = start.elapsed();
        info!(
            "GA finished after {} generations ({:?}) in {:.2}s, best fitness {}",
            self.generation,
            stop_reason,
            elapsed.as_secs_f64(),
            self.best_fitness()
        );

        let best = self
            .best
            .clone()
            .unwrap_or_else(|| Schedule::new(Arc::clone(&self.catalog)));
        let report = self.evaluator.report(&best);
        let stats = RunStatistics {
            generations: self.generation,
            best_fitness: best.fitness,
            history: self.history.clone(),
            is_valid: report.is_valid(),
            report,
            elapsed,
            stop_reason,
            generations_without_improvement: self.generations_without_improvement,
            skipped_sections: self.catalog.skipped_sections().to_vec(),
        };
        RunResult { best, stats }
    }

    fn best_fitness(&self) -> i64 {
        self.best.as_ref().map_or(0, |b| b.fitness)
    }

    fn average_fitness(&self) -> f64 {
        if self.population.is_empty() {
            return 0.0;
        }
        self.population.iter().map(|s| s.fitness as f64).sum::<f64>() / self.population.len() as f64
    }

    /// Evaluates every individual, sorts best first and tracks the best.
    fn evaluate_population(&mut self) {
        let evaluator = &self.evaluator;
        if self.config.parallel {
            self.population.par_iter_mut().for_each(|s| {
                evaluator.evaluate(s);
            });
        } else {
            for s in &mut self.population {
                evaluator.evaluate(s);
            }
        }
        self.population.sort_by(|a, b| b.fitness.cmp(&a.fitness));

        let Some(top) = self.population.first() else {
            return;
        };
        let improved = self.best.as_ref().map_or(true, |b| top.fitness > b.fitness);
        if improved {
            self.best = Some(top.clone());
            self.generations_without_improvement = 0;
        } else {
            self.generations_without_improvement += 1;
        }
    }
}

/// Index of the fittest among `size` distinct random contestants.
fn tournament_select<R: Rng>(population: &[Schedule], size: usize, rng: &mut R) -> usize {
    let k = size.min(population.len());
    sample(rng, population.len(), k)
        .into_iter()
        .max_by_key(|&i| population[i].fitness)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, CourseSection, Level, Room, Teacher, WeekLayout};

    fn catalog() -> Arc<Catalog> {
        let teachers = vec![
            Teacher::new("T1").with_course("MATH").with_course("SCI"),
            Teacher::new("T2").with_course("MATH").with_course("LANG"),
            Teacher::new("T3").with_course("LANG").with_course("SCI"),
        ];
        let sections = vec![
            CourseSection::new(Course::new("MATH", Level::Primary, 4), "A"),
            CourseSection::new(Course::new("MATH", Level::Primary, 4), "B"),
            CourseSection::new(Course::new("LANG", Level::Primary, 3), "A"),
            CourseSection::new(Course::new("LANG", Level::Primary, 3), "B"),
            CourseSection::new(Course::new("SCI", Level::Primary, 2), "A")
                .with_required_teacher("T3"),
        ];
        let rooms = vec![Room::new("R1", Level::All), Room::new("R2", Level::All)];
        Arc::new(Catalog::new(teachers, sections, rooms, WeekLayout::new(6)).unwrap())
    }

    fn single_class_catalog() -> Arc<Catalog> {
        let catalog = Catalog::new(
            vec![Teacher::new("T1").with_course("MATH")],
            vec![CourseSection::new(Course::new("MATH", Level::Primary, 1), "A")],
            vec![Room::new("R1", Level::All)],
            WeekLayout::new(4),
        )
        .unwrap();
        Arc::new(catalog)
    }

    fn small_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(10)
            .with_elitism(2)
            .with_max_generations(20)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let result = GeneticEngine::new(catalog(), GaConfig::default().with_population_size(0));
        assert!(matches!(result, Err(ConfigError::ZeroPopulation)));

        let config = GaConfig::default().with_population_size(4).with_elitism(4);
        assert!(matches!(
            GeneticEngine::new(catalog(), config),
            Err(ConfigError::ElitismTooLarge { .. })
        ));
    }

    #[test]
    fn test_initialize() {
        let mut engine = GeneticEngine::new(catalog(), small_config()).unwrap();
        engine.initialize();

        let pop = engine.population();
        assert_eq!(pop.len(), 10);
        assert!(pop.windows(2).all(|w| w[0].fitness >= w[1].fitness));
        assert_eq!(engine.best().map(|b| b.fitness), Some(pop[0].fitness));
        assert_eq!(engine.history, vec![(0, pop[0].fitness)]);
    }

    #[test]
    fn test_elitism_keeps_best_two() {
        let mut engine = GeneticEngine::new(catalog(), small_config()).unwrap();
        engine.initialize();
        let elite: Vec<Vec<_>> = engine.population()[..2]
            .iter()
            .map(|s| s.assignments().to_vec())
            .collect();
        let elite_fitness: Vec<i64> = engine.population()[..2].iter().map(|s| s.fitness).collect();

        engine.evolve_generation();

        assert_eq!(engine.population().len(), 10);
        for (genes, fitness) in elite.iter().zip(&elite_fitness) {
            assert!(
                engine
                    .population()
                    .iter()
                    .any(|s| s.assignments() == &genes[..] && s.fitness == *fitness),
                "elite individual missing from next generation"
            );
        }
        assert!(engine.population()[0].fitness >= elite_fitness[0]);
    }

    #[test]
    fn test_run_statistics_are_consistent() {
        let mut engine = GeneticEngine::new(catalog(), small_config()).unwrap();
        let result = engine.run();
        let stats = &result.stats;

        assert!(stats.generations <= 20);
        assert_eq!(stats.history.len(), stats.generations + 1);
        assert_eq!(stats.history[0].0, 0);
        assert!(stats.history.windows(2).all(|w| w[1].1 >= w[0].1));
        assert_eq!(stats.best_fitness, result.best.fitness);
        assert_eq!(stats.report.fitness, result.best.fitness);
        assert_eq!(stats.history.last().map(|h| h.1), Some(stats.best_fitness));
        assert_eq!(stats.is_valid, engine.evaluator().is_valid(&result.best));
        assert!(stats.skipped_sections.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = GeneticEngine::new(catalog(), small_config().with_max_generations(5))
            .unwrap()
            .run();
        let parallel = GeneticEngine::new(
            catalog(),
            small_config().with_max_generations(5).with_parallel(true),
        )
        .unwrap()
        .run();

        assert_eq!(sequential.stats.history, parallel.stats.history);
        assert_eq!(sequential.best.assignments(), parallel.best.assignments());
    }

    #[test]
    fn test_stop_on_target() {
        let config = small_config().with_target_fitness_ratio(0.5);
        let result = GeneticEngine::new(single_class_catalog(), config).unwrap().run();
        assert_eq!(result.stats.stop_reason, StopReason::TargetReached);
        assert_eq!(result.stats.generations, 0);
        assert_eq!(result.best.len(), 1);
    }

    #[test]
    fn test_stop_on_stagnation() {
        // One class per schedule: every individual scores the same.
        let config = small_config()
            .with_target_fitness_ratio(1.0)
            .with_crossover_probability(0.0)
            .with_stagnation_limit(3);
        let result = GeneticEngine::new(single_class_catalog(), config).unwrap().run();
        assert_eq!(result.stats.stop_reason, StopReason::Stagnation);
        assert_eq!(result.stats.generations, 3);
        assert_eq!(result.stats.generations_without_improvement, 3);
    }

    #[test]
    fn test_stop_on_max_generations() {
        let config = small_config()
            .with_target_fitness_ratio(1.0)
            .with_crossover_probability(0.0)
            .with_stagnation_limit(0)
            .with_max_generations(2);
        let result = GeneticEngine::new(single_class_catalog(), config).unwrap().run();
        assert_eq!(result.stats.stop_reason, StopReason::MaxGenerations);
        assert_eq!(result.stats.generations, 2);
        assert_eq!(result.stats.history.len(), 3);
    }

    #[test]
    fn test_skipped_sections_reported() {
        let catalog = Catalog::new(
            vec![Teacher::new("T1").with_course("MATH")],
            vec![
                CourseSection::new(Course::new("MATH", Level::Primary, 1), "A"),
                CourseSection::new(Course::new("ART", Level::Primary, 1), "A"),
            ],
            vec![Room::new("R1", Level::All)],
            WeekLayout::new(4),
        )
        .unwrap();
        let config = small_config().with_max_generations(1);
        let result = GeneticEngine::new(Arc::new(catalog), config).unwrap().run();
        assert_eq!(result.stats.skipped_sections.len(), 1);
        assert_eq!(result.stats.skipped_sections[0].course_id, "ART");
    }

    #[test]
    fn test_tournament_prefers_fitter() {
        let cat = single_class_catalog();
        let mut pop: Vec<Schedule> = (0..5).map(|_| Schedule::new(Arc::clone(&cat))).collect();
        for (i, s) in pop.iter_mut().enumerate() {
            s.fitness = i as i64 * 10;
        }
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(tournament_select(&pop, 5, &mut rng), 4);
        assert_eq!(tournament_select(&pop, 50, &mut rng), 4);
        let picked = tournament_select(&pop, 1, &mut rng);
        assert!(picked < 5);
    }

    #[test]
    fn test_statistics_serialize() {
        let mut engine = GeneticEngine::new(single_class_catalog(), small_config()).unwrap();
        let result = engine.run();
        let json = serde_json::to_string(&result.stats).unwrap();
        assert!(json.contains("\"stop_reason\""));
        assert!(json.contains("TeacherNoOverlap"));
    }
}
