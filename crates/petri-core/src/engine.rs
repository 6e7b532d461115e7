//! The Life engine.
//!
//! [`LifeEngine`] owns the current grid, a second buffer of the same size,
//! the neighbor topology for that size, and two counters: the live-cell
//! population and the generation number.
//!
//! # Population invariant
//!
//! After [`step`](LifeEngine::step), [`toggle`](LifeEngine::toggle),
//! [`reset`](LifeEngine::reset), [`resize`](LifeEngine::resize),
//! [`blit`](LifeEngine::blit) and [`seed_random`](LifeEngine::seed_random),
//! `population()` equals a full scan of the current grid. `step` and
//! `toggle` keep it incrementally; the others rescan.

use petri_grid::{DEAD, GridError, NeighborTopology, ToroidalGrid, count_live};
use petri_patterns::{Pattern, blit, extract};
use petri_types::{EngineSnapshot, Region};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Outcome of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
    /// The generation number after this step.
    pub generation: u64,
    /// Live cells after this step.
    pub population: u64,
    /// Cells that came alive.
    pub births: u64,
    /// Cells that died.
    pub deaths: u64,
}

/// B3/S23 transition for one cell.
const fn next_state(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2 | 3) | (false, 3))
}

/// A Game of Life simulation on a toroidal grid.
#[derive(Debug, Clone)]
pub struct LifeEngine {
    /// The grid read by the next step.
    current: ToroidalGrid,
    /// Scratch buffer written by the next step, then swapped in.
    next: ToroidalGrid,
    /// Neighbor table for the current size.
    topology: NeighborTopology,
    /// Live cells in `current`.
    population: u64,
    /// Steps taken since creation or the last reset.
    generation: u64,
}

impl LifeEngine {
    /// Create an engine with an all-dead grid of side `size`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimension`] if `size` is zero.
    pub fn new(size: usize) -> Result<Self, GridError> {
        Self::from_grid(ToroidalGrid::new(size)?)
    }

    /// Create an engine around an existing grid.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if the topology for the grid's size cannot be built.
    pub fn from_grid(grid: ToroidalGrid) -> Result<Self, GridError> {
        let size = grid.size();
        let topology = NeighborTopology::build(size)?;
        let next = ToroidalGrid::new(size)?;
        let population = grid.population();
        info!(size, population, "Engine created");
        Ok(Self {
            current: grid,
            next,
            topology,
            population,
            generation: 0,
        })
    }

    /// Advance one generation.
    pub fn step(&mut self) -> StepSummary {
        let current = self.current.cells();
        let mut population: u64 = 0;
        let mut births: u64 = 0;
        let mut deaths: u64 = 0;

        for ((neighbors, &cell), target) in self
            .topology
            .iter()
            .zip(current)
            .zip(self.next.cells_mut().iter_mut())
        {
            let alive = cell != DEAD;
            let survives = next_state(alive, count_live(neighbors, current));
            *target = u8::from(survives);
            population = population.saturating_add(u64::from(survives));
            if survives && !alive {
                births = births.saturating_add(1);
            } else if alive && !survives {
                deaths = deaths.saturating_add(1);
            }
        }

        std::mem::swap(&mut self.current, &mut self.next);
        self.population = population;
        self.generation = self.generation.saturating_add(1);

        let summary = StepSummary {
            generation: self.generation,
            population,
            births,
            deaths,
        };
        debug!(
            generation = summary.generation,
            population, births, deaths, "Generation advanced"
        );
        summary
    }

    /// Flip the cell at the literal index `y * size + x`.
    ///
    /// Returns the new state, or `None` if the index falls outside the grid
    /// and nothing changed.
    pub fn toggle(&mut self, x: usize, y: usize) -> Option<bool> {
        let toggled = self.current.toggle(x, y);
        match toggled {
            Some(true) => self.population = self.population.saturating_add(1),
            Some(false) => self.population = self.population.saturating_sub(1),
            None => warn!(x, y, size = self.size(), "Toggle outside grid ignored"),
        }
        toggled
    }

    /// Stamp `pattern` with its top-left cell at `(x, y)`, clipped at the far edges.
    ///
    /// Returns the number of cells written.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if the pattern rows cannot form a grid.
    pub fn blit(&mut self, x: usize, y: usize, pattern: &Pattern) -> Result<usize, GridError> {
        let written = blit(&mut self.current, x, y, pattern)?;
        self.population = self.current.population();
        info!(
            x,
            y,
            pattern = pattern.name(),
            written,
            population = self.population,
            "Pattern placed"
        );
        Ok(written)
    }

    /// Stamp `pattern` centred on the grid.
    ///
    /// A pattern larger than the grid is placed at the origin and clipped.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if the pattern rows cannot form a grid.
    pub fn blit_centred(&mut self, pattern: &Pattern) -> Result<usize, GridError> {
        let offset = self.size().saturating_sub(pattern.side()) / 2;
        self.blit(offset, offset, pattern)
    }

    /// Lift a square region out as an anonymous pattern. The region is clipped first.
    pub fn extract(&self, region: Region) -> Pattern {
        extract(&self.current, region)
    }

    /// Kill every cell and restart the generation count.
    pub fn reset(&mut self) {
        self.current.reset();
        self.population = 0;
        self.generation = 0;
        info!(size = self.size(), "Engine reset");
    }

    /// Change the side length, keeping the overlapping top-left square.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimension`] if `new_size` is zero. The
    /// engine is unchanged on error.
    pub fn resize(&mut self, new_size: usize) -> Result<(), GridError> {
        let topology = NeighborTopology::build(new_size)?;
        let next = ToroidalGrid::new(new_size)?;
        let from = self.size();
        self.current.resize(new_size)?;
        self.next = next;
        self.topology = topology;
        self.population = self.current.population();
        info!(from, to = new_size, population = self.population, "Engine resized");
        Ok(())
    }

    /// Fill the grid at random, each cell alive with probability `density`.
    ///
    /// The same `seed` always produces the same grid. `density` is clamped
    /// to `[0, 1]`; NaN counts as 0.
    pub fn seed_random(&mut self, seed: u64, density: f64) {
        let probability = if density.is_nan() {
            0.0
        } else {
            density.clamp(0.0, 1.0)
        };
        let mut rng = StdRng::seed_from_u64(seed);
        for cell in self.current.cells_mut() {
            *cell = u8::from(rng.random_bool(probability));
        }
        self.population = self.current.population();
        info!(seed, density = probability, population = self.population, "Grid seeded at random");
    }

    /// Whether the cell at `(x, y)` is alive, wrapping around the edges.
    pub fn alive(&self, x: isize, y: isize) -> bool {
        self.current.alive(x, y)
    }

    /// The current grid.
    pub const fn grid(&self) -> &ToroidalGrid {
        &self.current
    }

    /// Side length.
    pub const fn size(&self) -> usize {
        self.current.size()
    }

    /// Live cells.
    pub const fn population(&self) -> u64 {
        self.population
    }

    /// Generations since creation or the last reset.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// A copy of the engine state for renderers.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            size: self.size(),
            generation: self.generation,
            population: self.population,
            cells: self.current.cells().to_vec(),
        }
    }
}
