//! The periodic driver loop.
//!
//! [`run_driver`] advances a shared [`LifeEngine`] one generation per tick
//! with support for:
//!
//! - **Bounded runs**: stop after `max_ticks` or `max_real_time_seconds`
//! - **Pause/resume**: the loop parks until resumed
//! - **Variable speed**: the tick interval is re-read every tick
//! - **Stop conditions**: extinction and repeated grids, when enabled
//! - **Clean stop**: a stop request ends the loop before the next step
//!
//! [`PeriodicDriver`] owns the spawned loop task. The engine sits behind a
//! [`tokio::sync::Mutex`] and a step holds the lock without awaiting, so at
//! most one step or edit is ever in flight.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::control::{DriverControl, SimulationEndReason};
use crate::cycle::CycleDetector;
use crate::engine::{LifeEngine, StepSummary};

/// How long [`PeriodicDriver::stop`] waits for the loop to wind down before aborting it.
pub const STOP_GRACE: Duration = Duration::from_secs(1);

/// Result of a driver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverResult {
    /// The reason the run ended.
    pub end_reason: SimulationEndReason,
    /// The last step summary, if any step ran.
    pub final_summary: Option<StepSummary>,
    /// Steps taken during this run.
    pub total_ticks: u64,
}

/// Callback invoked after each step, while the engine is still locked.
pub trait TickCallback: Send {
    /// Called after a step completes.
    fn on_tick(&mut self, summary: &StepSummary, engine: &LifeEngine);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &StepSummary, _engine: &LifeEngine) {}
}

/// Drive `engine` until a stop condition is met.
pub async fn run_driver(
    engine: &Arc<Mutex<LifeEngine>>,
    control: &Arc<DriverControl>,
    callback: &mut dyn TickCallback,
) -> DriverResult {
    let mut last_summary: Option<StepSummary> = None;
    let mut total_ticks: u64 = 0;
    control.mark_run_start();
    let mut cycles = control
        .detect_cycles()
        .then(|| CycleDetector::new(control.cycle_history()));

    info!(
        max_ticks = control.max_ticks(),
        max_real_time_seconds = control.max_real_time_seconds(),
        tick_interval_ms = control.tick_interval_ms(),
        stop_on_extinction = control.stop_on_extinction(),
        detect_cycles = control.detect_cycles(),
        "Driver starting"
    );

    if let Some(detector) = cycles.as_mut() {
        let _ = detector.observe(engine.lock().await.grid());
    }

    let end_reason = loop {
        if control.is_paused() {
            info!("Driver paused, waiting for resume...");
            control.wait_if_paused().await;
            info!("Driver resumed");
        }

        if control.is_stop_requested() {
            info!("Stop requested");
            break SimulationEndReason::OperatorStop;
        }

        if control.time_limit_reached() {
            info!(
                max_seconds = control.max_real_time_seconds(),
                elapsed = control.elapsed_seconds(),
                "Real-time limit reached"
            );
            break SimulationEndReason::MaxRealTimeReached;
        }

        let (summary, period) = {
            let mut engine = engine.lock().await;
            let summary = engine.step();
            callback.on_tick(&summary, &engine);
            let period = cycles
                .as_mut()
                .and_then(|detector| detector.observe(engine.grid()));
            (summary, period)
        };
        total_ticks = total_ticks.saturating_add(1);
        last_summary = Some(summary);

        if control.stop_on_extinction() && summary.population == 0 {
            info!(generation = summary.generation, "Every cell is dead -- extinction");
            break SimulationEndReason::Extinction;
        }

        if let Some(period) = period {
            info!(generation = summary.generation, period, "Grid repeated");
            break SimulationEndReason::CycleDetected;
        }

        if control.tick_limit_reached(total_ticks) {
            info!(
                generation = summary.generation,
                max_ticks = control.max_ticks(),
                "Tick limit reached"
            );
            break SimulationEndReason::MaxTicksReached;
        }

        control.sleep_interval().await;
    };

    control.set_end_reason(end_reason).await;
    DriverResult {
        end_reason,
        final_summary: last_summary,
        total_ticks,
    }
}

/// Log the end of a driver run.
pub fn log_driver_end(result: &DriverResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_generation = result.final_summary.map(|s| s.generation),
        final_population = result.final_summary.map(|s| s.population),
        "Driver ended"
    );

    if let Some(summary) = result.final_summary {
        info!(
            generation = summary.generation,
            population = summary.population,
            births = summary.births,
            deaths = summary.deaths,
            "Final step summary"
        );
    } else {
        warn!("Driver ended with no steps executed");
    }
}

/// Owns a spawned [`run_driver`] task.
#[derive(Debug)]
pub struct PeriodicDriver {
    /// The engine being driven.
    engine: Arc<Mutex<LifeEngine>>,
    /// Shared control state.
    control: Arc<DriverControl>,
    /// The running loop, if started.
    task: Option<JoinHandle<DriverResult>>,
}

impl PeriodicDriver {
    /// Create a stopped driver.
    pub const fn new(engine: Arc<Mutex<LifeEngine>>, control: Arc<DriverControl>) -> Self {
        Self {
            engine,
            control,
            task: None,
        }
    }

    /// The engine being driven.
    pub const fn engine(&self) -> &Arc<Mutex<LifeEngine>> {
        &self.engine
    }

    /// The shared control state.
    pub const fn control(&self) -> &Arc<DriverControl> {
        &self.control
    }

    /// Whether the loop task is alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Spawn the loop. Returns `false` without doing anything if it is already running.
    pub fn start(&mut self, callback: Box<dyn TickCallback>) -> bool {
        if self.is_running() {
            return false;
        }
        self.control.clear_stop();
        let engine = Arc::clone(&self.engine);
        let control = Arc::clone(&self.control);
        self.task = Some(tokio::spawn(async move {
            let mut callback = callback;
            run_driver(&engine, &control, callback.as_mut()).await
        }));
        true
    }

    /// Stop the loop and return its result.
    ///
    /// Requests a stop, wakes a paused loop, and gives it [`STOP_GRACE`] to
    /// finish before aborting the task. Returns `None` if the driver was not
    /// started or the task had to be aborted.
    pub async fn stop(&mut self) -> Option<DriverResult> {
        let mut task = self.task.take()?;
        self.control.request_stop();
        self.control.resume();

        match tokio::time::timeout(STOP_GRACE, &mut task).await {
            Ok(Ok(result)) => Some(result),
            Ok(Err(join_error)) => {
                warn!(error = %join_error, "Driver task failed");
                None
            }
            Err(_elapsed) => {
                task.abort();
                warn!("Driver task did not stop in time, aborted");
                None
            }
        }
    }

    /// Wait for the loop to end on its own and return its result.
    ///
    /// Returns `None` if the driver was not started or the task failed.
    pub async fn join(&mut self) -> Option<DriverResult> {
        let task = self.task.take()?;
        match task.await {
            Ok(result) => Some(result),
            Err(join_error) => {
                warn!(error = %join_error, "Driver task failed");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;

    fn shared_engine(size: usize, live: &[(usize, usize)]) -> Arc<Mutex<LifeEngine>> {
        let mut engine = LifeEngine::new(size).unwrap();
        for &(x, y) in live {
            let _ = engine.toggle(x, y);
        }
        Arc::new(Mutex::new(engine))
    }

    fn control(bounds: SimulationConfig) -> Arc<DriverControl> {
        Arc::new(DriverControl::new(0, &bounds))
    }

    const BLINKER: [(usize, usize); 3] = [(1, 2), (2, 2), (3, 2)];

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let engine = shared_engine(5, &BLINKER);
        let control = control(SimulationConfig {
            max_ticks: 5,
            ..SimulationConfig::default()
        });

        let result = run_driver(&engine, &control, &mut NoOpCallback).await;

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.final_summary.map(|s| s.generation), Some(5));
        assert_eq!(engine.lock().await.generation(), 5);
        assert_eq!(
            control.end_reason().await,
            Some(SimulationEndReason::MaxTicksReached)
        );
    }

    #[tokio::test]
    async fn stop_before_first_tick() {
        let engine = shared_engine(5, &BLINKER);
        let control = control(SimulationConfig::default());
        control.request_stop();

        let result = run_driver(&engine, &control, &mut NoOpCallback).await;

        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_summary.is_none());
    }

    #[tokio::test]
    async fn extinction_ends_run() {
        // A lone cell dies in one generation.
        let engine = shared_engine(4, &[(1, 1)]);
        let control = control(SimulationConfig {
            stop_on_extinction: true,
            ..SimulationConfig::default()
        });

        let result = run_driver(&engine, &control, &mut NoOpCallback).await;

        assert_eq!(result.end_reason, SimulationEndReason::Extinction);
        assert_eq!(result.total_ticks, 1);
    }

    #[tokio::test]
    async fn oscillator_is_detected() {
        let engine = shared_engine(5, &BLINKER);
        let control = control(SimulationConfig {
            detect_cycles: true,
            cycle_history: 4,
            ..SimulationConfig::default()
        });

        let result = run_driver(&engine, &control, &mut NoOpCallback).await;

        assert_eq!(result.end_reason, SimulationEndReason::CycleDetected);
        assert_eq!(result.total_ticks, 2);
    }

    #[tokio::test]
    async fn tick_callback_is_called() {
        struct CountCallback {
            count: u64,
            population: u64,
        }
        impl TickCallback for CountCallback {
            fn on_tick(&mut self, summary: &StepSummary, engine: &LifeEngine) {
                self.count = self.count.saturating_add(1);
                self.population = engine.population();
                assert_eq!(summary.population, engine.population());
            }
        }

        let engine = shared_engine(5, &BLINKER);
        let control = control(SimulationConfig {
            max_ticks: 3,
            ..SimulationConfig::default()
        });
        let mut callback = CountCallback {
            count: 0,
            population: 0,
        };

        let _ = run_driver(&engine, &control, &mut callback).await;

        assert_eq!(callback.count, 3);
        assert_eq!(callback.population, 3);
    }

    #[tokio::test]
    async fn periodic_driver_start_and_stop() {
        let engine = shared_engine(5, &BLINKER);
        let control = Arc::new(DriverControl::new(10, &SimulationConfig::default()));
        let mut driver = PeriodicDriver::new(Arc::clone(&engine), control);

        assert!(driver.stop().await.is_none());
        assert!(driver.start(Box::new(NoOpCallback)));
        assert!(!driver.start(Box::new(NoOpCallback)));
        assert!(driver.is_running());

        tokio::time::sleep(Duration::from_millis(50)).await;
        let result = driver.stop().await.unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert!(!driver.is_running());
        assert!(driver.stop().await.is_none());

        let engine = engine.lock().await;
        assert_eq!(engine.generation(), result.total_ticks);
        assert_eq!(engine.population(), 3);
    }

    #[tokio::test]
    async fn paused_driver_stops() {
        let engine = shared_engine(5, &BLINKER);
        let control = Arc::new(DriverControl::new(10, &SimulationConfig::default()));
        control.pause();
        let mut driver = PeriodicDriver::new(engine, Arc::clone(&control));
        assert!(driver.start(Box::new(NoOpCallback)));

        tokio::time::sleep(Duration::from_millis(20)).await;
        let result = driver.stop().await.unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
        assert!(!control.is_paused());
    }

    #[tokio::test]
    async fn driver_restarts_after_stop() {
        let engine = shared_engine(5, &BLINKER);
        let control = Arc::new(DriverControl::new(0, &SimulationConfig {
            max_ticks: 2,
            ..SimulationConfig::default()
        }));
        let mut driver = PeriodicDriver::new(Arc::clone(&engine), control);

        assert!(driver.start(Box::new(NoOpCallback)));
        let first = driver.join().await.unwrap();
        assert_eq!(first.end_reason, SimulationEndReason::MaxTicksReached);

        assert!(driver.start(Box::new(NoOpCallback)));
        let second = driver.join().await.unwrap();
        assert_eq!(second.total_ticks, 2);
        assert_eq!(engine.lock().await.generation(), 4);
    }

    #[tokio::test]
    async fn time_limit_restarts_with_each_run() {
        let engine = shared_engine(5, &BLINKER);
        let control = Arc::new(DriverControl::new(100, &SimulationConfig {
            max_real_time_seconds: 1,
            ..SimulationConfig::default()
        }));
        let mut driver = PeriodicDriver::new(Arc::clone(&engine), control);

        assert!(driver.start(Box::new(NoOpCallback)));
        let first = driver.join().await.unwrap();
        assert_eq!(first.end_reason, SimulationEndReason::MaxRealTimeReached);
        assert!(first.total_ticks > 0);

        assert!(driver.start(Box::new(NoOpCallback)));
        let second = driver.join().await.unwrap();
        assert_eq!(second.end_reason, SimulationEndReason::MaxRealTimeReached);
        assert!(second.total_ticks > 0);
    }
}
