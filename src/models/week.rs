//! Week layout and availability grids.
//!
//! A teaching week is a fixed grid of days × periods. Every placement,
//! availability lookup and per-entity matrix is expressed in these
//! coordinates.
//!
//! # Grid Model
//! Day indices run `0..days` (Monday = 0) and period indices run
//! `0..periods`. Lookups outside the grid are treated as unavailable.

use serde::{Deserialize, Serialize};

/// Number of teaching days in a week.
pub const DAYS_PER_WEEK: usize = 5;

/// Periods per day in the reference layout.
pub const DEFAULT_PERIODS_PER_DAY: usize = 10;

/// Shape of the teaching week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekLayout {
    /// Number of days (fixed at [`DAYS_PER_WEEK`] by the constructors).
    pub days: usize,
    /// Number of periods per day.
    pub periods: usize,
}

impl WeekLayout {
    /// Creates a five-day layout with the given number of periods per day.
    pub fn new(periods: usize) -> Self {
        Self {
            days: DAYS_PER_WEEK,
            periods,
        }
    }

    /// Total number of slots in the week.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.days * self.periods
    }

    /// Whether a slot lies inside the grid.
    #[inline]
    pub fn contains(&self, slot: TimeSlot) -> bool {
        slot.day < self.days && slot.period < self.periods
    }

    /// Iterates every slot, day-major.
    pub fn slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        (0..self.days).flat_map(move |day| (0..self.periods).map(move |period| TimeSlot::new(day, period)))
    }

    /// An empty day × period grid.
    pub fn empty_grid<T: Clone>(&self) -> Vec<Vec<Option<T>>> {
        vec![vec![None; self.periods]; self.days]
    }
}

impl Default for WeekLayout {
    fn default() -> Self {
        Self::new(DEFAULT_PERIODS_PER_DAY)
    }
}

/// A (day, period) coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day index (0 = first teaching day).
    pub day: usize,
    /// Period index within the day.
    pub period: usize,
}

impl TimeSlot {
    /// Creates a new slot.
    #[inline]
    pub fn new(day: usize, period: usize) -> Self {
        Self { day, period }
    }
}

/// Day × period boolean availability grid.
///
/// `grid[day][period] == true` means the owner can be scheduled there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    grid: Vec<Vec<bool>>,
}

impl Availability {
    /// Wraps an explicit grid.
    pub fn from_grid(grid: Vec<Vec<bool>>) -> Self {
        Self { grid }
    }

    /// A grid with every slot available.
    pub fn full(layout: WeekLayout) -> Self {
        Self {
            grid: vec![vec![true; layout.periods]; layout.days],
        }
    }

    /// Marks a slot as blocked. Out-of-range slots are ignored.
    pub fn with_blocked(mut self, day: usize, period: usize) -> Self {
        if let Some(cell) = self.grid.get_mut(day).and_then(|row| row.get_mut(period)) {
            *cell = false;
        }
        self
    }

    /// Whether the slot is available. Out-of-range lookups return `false`.
    pub fn is_available(&self, day: usize, period: usize) -> bool {
        self.grid
            .get(day)
            .and_then(|row| row.get(period))
            .copied()
            .unwrap_or(false)
    }

    /// Whether the grid has exactly the layout's shape.
    pub fn matches(&self, layout: WeekLayout) -> bool {
        self.grid.len() == layout.days && self.grid.iter().all(|row| row.len() == layout.periods)
    }

    /// Number of available slots.
    pub fn available_count(&self) -> usize {
        self.grid.iter().flatten().filter(|&&free| free).count()
    }
}
