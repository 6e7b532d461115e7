//! Tick callback that reports progress through `tracing`.

use petri_core::engine::{LifeEngine, StepSummary};
use petri_core::runner::TickCallback;
use tracing::{debug, info};

/// Logs every generation at debug level and a summary every `interval` generations.
pub struct TickLogger {
    /// Generations between info-level summaries (0 = never).
    interval: u64,
    /// Highest population seen so far.
    peak_population: u64,
}

impl TickLogger {
    /// Create a logger that summarises every `interval` generations.
    pub const fn new(interval: u64) -> Self {
        Self {
            interval,
            peak_population: 0,
        }
    }

    /// Whether `generation` gets an info-level summary.
    pub fn is_summary_generation(&self, generation: u64) -> bool {
        generation.checked_rem(self.interval) == Some(0)
    }

    /// Highest population seen so far.
    pub const fn peak_population(&self) -> u64 {
        self.peak_population
    }
}

impl TickCallback for TickLogger {
    fn on_tick(&mut self, summary: &StepSummary, engine: &LifeEngine) {
        self.peak_population = self.peak_population.max(summary.population);
        debug!(
            generation = summary.generation,
            population = summary.population,
            births = summary.births,
            deaths = summary.deaths,
            "Tick"
        );

        if self.is_summary_generation(summary.generation) {
            info!(
                generation = summary.generation,
                population = summary.population,
                peak_population = self.peak_population,
                size = engine.size(),
                "Progress"
            );
        }
    }
}
