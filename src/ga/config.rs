//! Genetic search configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::operators::CrossoverType;
use crate::evaluator::ConstraintWeights;

/// Configuration errors, reported before a run starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population_size must be at least 1")]
    ZeroPopulation,

    #[error("elitism ({elitism}) must be smaller than population_size ({population})")]
    ElitismTooLarge { elitism: usize, population: usize },

    #[error("{name} must be within [0, 1] (got {value})")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("target_fitness_ratio must be within (0, 1] (got {0})")]
    InvalidTargetRatio(f64),

    #[error("tournament_size must be at least 1")]
    ZeroTournament,

    #[error("at least one crossover operator is required")]
    NoCrossover,

    #[error("base_fitness must be positive (got {0})")]
    NonPositiveBaseFitness(i64),
}

/// Configuration for the timetabling genetic search.
///
/// # Examples
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_elitism(3)
///     .with_max_generations(200)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals per generation.
    pub population_size: usize,

    /// Probability that a selected pair is recombined.
    pub crossover_probability: f64,

    /// Base mutation probability. RescheduleSlot fires with this
    /// probability, RoomReassign and SwapSlots with half of it.
    pub mutation_probability: f64,

    /// Best individuals copied unchanged into the next generation.
    pub elitism: usize,

    /// Upper bound on generations.
    pub max_generations: usize,

    /// Stop once best fitness reaches this fraction of `base_fitness`.
    pub target_fitness_ratio: f64,

    /// Generations without improvement before stopping (0 to disable).
    pub stagnation_limit: usize,

    /// Contestants per tournament.
    pub tournament_size: usize,

    /// Share of the initial population built heuristically (at least one).
    pub heuristic_share: f64,

    /// Fitness ceiling.
    pub base_fitness: i64,

    /// Rule weights.
    pub weights: ConstraintWeights,

    /// Crossover operators; one is drawn per recombination.
    pub crossovers: Vec<CrossoverType>,

    /// Whether to evaluate and seed the population in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_probability: 0.8,
            mutation_probability: 0.2,
            elitism: 5,
            max_generations: 500,
            target_fitness_ratio: 0.95,
            stagnation_limit: 50,
            tournament_size: 3,
            heuristic_share: 0.25,
            base_fitness: 10_000,
            weights: ConstraintWeights::default(),
            crossovers: CrossoverType::ALL.to_vec(),
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    pub fn with_elitism(mut self, n: usize) -> Self {
        self.elitism = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_target_fitness_ratio(mut self, ratio: f64) -> Self {
        self.target_fitness_ratio = ratio;
        self
    }

    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
        self
    }

    pub fn with_tournament_size(mut self, n: usize) -> Self {
        self.tournament_size = n;
        self
    }

    pub fn with_heuristic_share(mut self, share: f64) -> Self {
        self.heuristic_share = share;
        self
    }

    pub fn with_base_fitness(mut self, base: i64) -> Self {
        self.base_fitness = base;
        self
    }

    pub fn with_weights(mut self, weights: ConstraintWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_crossovers(mut self, crossovers: Vec<CrossoverType>) -> Self {
        self.crossovers = crossovers;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of heuristically built individuals in the initial population.
    pub fn heuristic_count(&self) -> usize {
        ((self.population_size as f64 * self.heuristic_share) as usize)
            .max(1)
            .min(self.population_size)
    }

    /// Fitness at which the search stops early.
    pub fn target_fitness(&self) -> f64 {
        self.target_fitness_ratio * self.base_fitness as f64
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.elitism >= self.population_size {
            return Err(ConfigError::ElitismTooLarge {
                elitism: self.elitism,
                population: self.population_size,
            });
        }
        for (name, value) in [
            ("crossover_probability", self.crossover_probability),
            ("mutation_probability", self.mutation_probability),
            ("heuristic_share", self.heuristic_share),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        if !(self.target_fitness_ratio > 0.0 && self.target_fitness_ratio <= 1.0) {
            return Err(ConfigError::InvalidTargetRatio(self.target_fitness_ratio));
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::ZeroTournament);
        }
        if self.crossovers.is_empty() {
            return Err(ConfigError::NoCrossover);
        }
        if self.base_fitness <= 0 {
            return Err(ConfigError::NonPositiveBaseFitness(self.base_fitness));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert!((config.crossover_probability - 0.8).abs() < 1e-10);
        assert!((config.mutation_probability - 0.2).abs() < 1e-10);
        assert_eq!(config.elitism, 5);
        assert_eq!(config.max_generations, 500);
        assert_eq!(config.stagnation_limit, 50);
        assert_eq!(config.tournament_size, 3);
        assert_eq!(config.crossovers.len(), 3);
        assert!((config.target_fitness() - 9500.0).abs() < 1e-9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_heuristic_count() {
        assert_eq!(GaConfig::default().heuristic_count(), 25);
        assert_eq!(GaConfig::default().with_population_size(3).heuristic_count(), 1);
        let none = GaConfig::default().with_population_size(10).with_heuristic_share(0.0);
        assert_eq!(none.heuristic_count(), 1);
        let all = GaConfig::default().with_population_size(10).with_heuristic_share(1.0);
        assert_eq!(all.heuristic_count(), 10);
    }

    #[test]
    fn test_validate_zero_population() {
        let config = GaConfig::default().with_population_size(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroPopulation));
    }

    #[test]
    fn test_validate_elitism() {
        let config = GaConfig::default().with_population_size(5).with_elitism(5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ElitismTooLarge {
                elitism: 5,
                population: 5
            })
        );
    }

    #[test]
    fn test_validate_probabilities() {
        let config = GaConfig::default().with_mutation_probability(1.5);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mutation_probability"));

        let config = GaConfig::default().with_target_fitness_ratio(0.0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTargetRatio(_))));
    }

    #[test]
    fn test_validate_other_fields() {
        assert_eq!(
            GaConfig::default().with_tournament_size(0).validate(),
            Err(ConfigError::ZeroTournament)
        );
        assert_eq!(
            GaConfig::default().with_crossovers(vec![]).validate(),
            Err(ConfigError::NoCrossover)
        );
        assert_eq!(
            GaConfig::default().with_base_fitness(0).validate(),
            Err(ConfigError::NonPositiveBaseFitness(0))
        );
    }

    #[test]
    fn test_serde_roundtrip_and_partial() {
        let config = GaConfig::default().with_seed(42).with_parallel(false);
        let json = serde_json::to_string(&config).unwrap();
        let back: GaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let partial: GaConfig =
            serde_json::from_str(r#"{"population_size": 20, "elitism": 2}"#).unwrap();
        assert_eq!(partial.population_size, 20);
        assert_eq!(partial.elitism, 2);
        assert_eq!(partial.max_generations, 500);
        assert!(partial.validate().is_ok());
    }
}
