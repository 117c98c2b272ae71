//! Weekly school timetabling.
//!
//! Places the weekly class hours of course sections into a day × period
//! grid, assigning a teacher and a room to each hour. A genetic search
//! minimizes weighted violations of hard rules (no double-booking, teacher
//! quotas, room levels, mandated teachers) and soft rules (teacher gaps,
//! balanced daily load).
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Teacher`, `Room`, `Course`, `CourseSection`,
//!   `Catalog`, `Schedule`, `Assignment`, `Constraint`
//! - **`evaluator`**: Weighted fitness and per-rule reports
//! - **`ga`**: Population generator, crossover and mutation operators, and
//!   the generational engine
//! - **`kpi`**: Compliance indicators for a finished schedule
//! - **`validation`**: Input integrity checks (duplicate IDs, availability shape)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use u_timetable::ga::{GaConfig, GeneticEngine};
//! use u_timetable::models::{Catalog, Course, CourseSection, Level, Room, Teacher, WeekLayout};
//!
//! let catalog = Catalog::new(
//!     vec![Teacher::new("T1").with_course("MATH")],
//!     vec![CourseSection::new(Course::new("MATH", Level::Primary, 2), "A")],
//!     vec![Room::new("R1", Level::All)],
//!     WeekLayout::new(4),
//! )
//! .unwrap();
//!
//! let config = GaConfig::default()
//!     .with_population_size(8)
//!     .with_elitism(1)
//!     .with_max_generations(5)
//!     .with_seed(1);
//! let result = GeneticEngine::new(Arc::new(catalog), config).unwrap().run();
//! assert_eq!(result.best.len(), 2);
//! assert!(result.stats.is_valid);
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

pub mod evaluator;
pub mod ga;
pub mod kpi;
pub mod models;
pub mod validation;
