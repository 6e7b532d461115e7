//! Engine binary for the Petri Life simulation.
//!
//! Loads configuration, seeds a grid and drives it one generation per tick
//! until a configured bound is hit or Ctrl-C is pressed.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `petri-config.yaml` (or `PETRI_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the pattern library and save the seed shelf
//! 4. Create the engine and place the seed pattern or a random fill
//! 5. Create driver control from the simulation bounds
//! 6. Run the periodic driver, stopping on Ctrl-C
//! 7. Log the result

mod error;
mod shelf;
mod tick_logger;

use std::sync::Arc;

use petri_core::config::PetriConfig;
use petri_core::control::DriverControl;
use petri_core::engine::LifeEngine;
use petri_core::runner::{self, PeriodicDriver};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::tick_logger::TickLogger;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, library setup or seeding fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so the path is logged below.
    let config_path = PetriConfig::resolve_path();
    let config = PetriConfig::load_or_default(&config_path).map_err(EngineError::from)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        path = %config_path.display(),
        size = config.world.size,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        "petri-engine starting"
    );

    // 3. Pattern library.
    let library = shelf::build_library(&config.library).map_err(EngineError::from)?;

    // 4. Engine and initial population.
    let mut engine = LifeEngine::new(config.world.size).map_err(EngineError::from)?;
    seed_engine(&mut engine, &config, &library)?;

    // 5. Driver control.
    let control = Arc::new(DriverControl::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));
    info!(
        max_ticks = control.max_ticks(),
        max_real_time_seconds = control.max_real_time_seconds(),
        stop_on_extinction = control.stop_on_extinction(),
        detect_cycles = control.detect_cycles(),
        "Driver control initialized"
    );

    // 6. Run until a bound is hit or Ctrl-C.
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping");
                    control.request_stop();
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }

    let engine = Arc::new(Mutex::new(engine));
    let mut driver = PeriodicDriver::new(Arc::clone(&engine), control);
    driver.start(Box::new(TickLogger::new(config.logging.summary_interval)));
    let result = driver.join().await;

    // 7. Log results.
    if let Some(result) = result {
        runner::log_driver_end(&result);
    }

    let snapshot = engine.lock().await.snapshot();
    info!(
        generation = snapshot.generation,
        population = snapshot.population,
        size = snapshot.size,
        "petri-engine shutdown complete"
    );

    Ok(())
}

/// Place the configured seed pattern centred on the grid, or fill at random.
fn seed_engine(
    engine: &mut LifeEngine,
    config: &PetriConfig,
    library: &petri_patterns::PatternLibrary,
) -> Result<(), EngineError> {
    if let Some(name) = config.world.seed_pattern.as_deref() {
        let pattern = shelf::find_pattern(library, name)?.ok_or_else(|| {
            EngineError::UnknownPattern {
                name: name.to_owned(),
            }
        })?;
        engine.blit_centred(&pattern)?;
    } else if config.world.random_density > 0.0 {
        engine.seed_random(config.world.seed, config.world.random_density);
    } else {
        warn!("No seed pattern or random density configured, grid starts empty");
    }
    Ok(())
}
