//! Weighted-penalty fitness evaluation.
//!
//! Fitness is a ceiling minus weighted violations:
//!
//! ```text
//! fitness = max(0, base − Σ hard violations × weight − Σ soft violations × weight)
//! ```
//!
//! A schedule is valid iff every hard rule reports zero violations.
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent research directions in automated timetabling",
//! Sec. 3 (penalty functions)

use serde::{Deserialize, Serialize};

use crate::models::{Constraint, ConstraintClass, Schedule};

/// Per-rule weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintWeights {
    pub teacher_no_overlap: i64,
    pub room_no_overlap: i64,
    pub section_no_overlap: i64,
    pub teacher_min_hours: i64,
    pub room_level_match: i64,
    pub specific_teacher: i64,
    pub minimize_gaps: i64,
    pub balanced_distribution: i64,
}

impl Default for ConstraintWeights {
    fn default() -> Self {
        Self {
            teacher_no_overlap: 1000,
            room_no_overlap: 1000,
            section_no_overlap: 1000,
            teacher_min_hours: 1000,
            room_level_match: 1000,
            specific_teacher: 1000,
            minimize_gaps: 10,
            balanced_distribution: 5,
        }
    }
}

impl ConstraintWeights {
    /// Weight configured for a rule.
    pub fn weight_of(&self, rule: Constraint) -> i64 {
        match rule {
            Constraint::TeacherNoOverlap => self.teacher_no_overlap,
            Constraint::RoomNoOverlap => self.room_no_overlap,
            Constraint::SectionNoOverlap => self.section_no_overlap,
            Constraint::TeacherMinHours => self.teacher_min_hours,
            Constraint::RoomLevelMatch => self.room_level_match,
            Constraint::SpecificTeacherAssignment => self.specific_teacher,
            Constraint::MinimizeGaps => self.minimize_gaps,
            Constraint::BalancedDistribution => self.balanced_distribution,
        }
    }
}

/// A rule paired with its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedConstraint {
    pub rule: Constraint,
    pub weight: i64,
}

/// Outcome of one rule in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub name: &'static str,
    pub class: ConstraintClass,
    pub violations: u64,
    pub weight: i64,
    pub penalty: i64,
}

/// Per-rule breakdown of a schedule's fitness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub rules: Vec<RuleOutcome>,
    pub hard_penalty: i64,
    pub soft_penalty: i64,
    pub fitness: i64,
}

impl EvaluationReport {
    /// Whether all hard rules are satisfied.
    pub fn is_valid(&self) -> bool {
        self.rules
            .iter()
            .filter(|r| r.class == ConstraintClass::Hard)
            .all(|r| r.violations == 0)
    }

    /// Outcome of a rule by name.
    pub fn rule(&self, name: &str) -> Option<&RuleOutcome> {
        self.rules.iter().find(|r| r.name == name)
    }
}

/// Scores schedules against a weighted rule set.
#[derive(Debug, Clone)]
pub struct Evaluator {
    rules: Vec<WeightedConstraint>,
    base_fitness: i64,
}

impl Evaluator {
    /// Creates an evaluator with no rules.
    pub fn new(base_fitness: i64) -> Self {
        Self {
            rules: Vec::new(),
            base_fitness,
        }
    }

    /// Adds a weighted rule.
    pub fn with_rule(mut self, rule: Constraint, weight: i64) -> Self {
        self.rules.push(WeightedConstraint { rule, weight });
        self
    }

    /// The full rule set with the given weights.
    pub fn standard(weights: &ConstraintWeights, base_fitness: i64) -> Self {
        Constraint::ALL
            .into_iter()
            .fold(Self::new(base_fitness), |ev, rule| {
                ev.with_rule(rule, weights.weight_of(rule))
            })
    }

    /// Fitness ceiling.
    pub fn base_fitness(&self) -> i64 {
        self.base_fitness
    }

    /// Configured rules.
    pub fn rules(&self) -> &[WeightedConstraint] {
        &self.rules
    }

    /// Fitness of a schedule without storing it.
    pub fn fitness(&self, schedule: &Schedule) -> i64 {
        let penalty: i64 = self
            .rules
            .iter()
            .map(|w| w.rule.evaluate(schedule) as i64 * w.weight)
            .sum();
        (self.base_fitness - penalty).max(0)
    }

    /// Computes fitness and stores it on the schedule.
    pub fn evaluate(&self, schedule: &mut Schedule) -> i64 {
        let fitness = self.fitness(schedule);
        schedule.fitness = fitness;
        fitness
    }

    /// Whether every hard rule yields zero violations.
    pub fn is_valid(&self, schedule: &Schedule) -> bool {
        self.rules
            .iter()
            .filter(|w| w.rule.class() == ConstraintClass::Hard)
            .all(|w| w.rule.evaluate(schedule) == 0)
    }

    /// Per-rule violations, weights and penalties.
    pub fn report(&self, schedule: &Schedule) -> EvaluationReport {
        let mut hard_penalty = 0;
        let mut soft_penalty = 0;
        let rules: Vec<RuleOutcome> = self
            .rules
            .iter()
            .map(|w| {
                let violations = w.rule.evaluate(schedule);
                let penalty = violations as i64 * w.weight;
                match w.rule.class() {
                    ConstraintClass::Hard => hard_penalty += penalty,
                    ConstraintClass::Soft => soft_penalty += penalty,
                }
                RuleOutcome {
                    name: w.rule.name(),
                    class: w.rule.class(),
                    violations,
                    weight: w.weight,
                    penalty,
                }
            })
            .collect();

        EvaluationReport {
            rules,
            hard_penalty,
            soft_penalty,
            fitness: (self.base_fitness - hard_penalty - soft_penalty).max(0),
        }
    }
}
