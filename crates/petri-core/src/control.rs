//! Shared control state for a running driver.
//!
//! The driver loop and whoever steers it (the binary's Ctrl-C handler, a UI
//! layer) share one [`DriverControl`] through an [`Arc`]. Every field read
//! on the hot path is atomic, so checking for pause or stop never takes a
//! lock.
//!
//! [`Arc`]: std::sync::Arc

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::config::SimulationConfig;

/// Smallest tick interval accepted at runtime, in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Reason a driver run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// Stop was requested.
    OperatorStop,
    /// Every cell died.
    Extinction,
    /// The grid repeated a recent state.
    CycleDetected,
}

/// Shared driver control state.
#[derive(Debug)]
pub struct DriverControl {
    /// Whether the driver is paused.
    paused: AtomicBool,

    /// Wakes the loop on resume.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Wakes the loop out of its inter-tick sleep on stop.
    stop_notify: Notify,

    /// Milliseconds between generations (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Wall-clock start of the current run, in epoch milliseconds.
    run_started_ms: AtomicI64,

    /// Generations per run (0 = unlimited).
    max_ticks: u64,

    /// Wall-clock seconds (0 = unlimited).
    max_real_time_seconds: u64,

    /// End the run when the population reaches zero.
    stop_on_extinction: bool,

    /// End the run when the grid repeats.
    detect_cycles: bool,

    /// Grids remembered for cycle detection.
    cycle_history: usize,

    /// Reason the last run ended, if it has.
    end_reason: Mutex<Option<SimulationEndReason>>,
}

impl DriverControl {
    /// Create control state from configuration.
    ///
    /// The initial interval is taken as given; 0 means no sleep between
    /// generations. Runtime changes go through
    /// [`set_tick_interval_ms`](Self::set_tick_interval_ms).
    pub fn new(tick_interval_ms: u64, bounds: &SimulationConfig) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::new(),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            run_started_ms: AtomicI64::new(Utc::now().timestamp_millis()),
            max_ticks: bounds.max_ticks,
            max_real_time_seconds: bounds.max_real_time_seconds,
            stop_on_extinction: bounds.stop_on_extinction,
            detect_cycles: bounds.detect_cycles,
            cycle_history: bounds.cycle_history,
            end_reason: Mutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the driver is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the driver. The loop sleeps until resumed or stopped.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the driver and wake the loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the driver is no longer paused or a stop is requested.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop. Wakes a sleeping or paused loop.
    ///
    /// Only a loop already parked in [`sleep_interval`](Self::sleep_interval)
    /// is woken; no permit is left behind for a later run.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_waiters();
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Withdraw a stop request so the driver can be started again.
    pub fn clear_stop(&self) {
        self.stop_requested.store(false, Ordering::Release);
    }

    /// Sleep for the current tick interval, returning early on stop.
    pub async fn sleep_interval(&self) {
        let interval_ms = self.tick_interval_ms();
        if interval_ms == 0 {
            return;
        }
        let stopped = self.stop_notify.notified();
        tokio::pin!(stopped);
        // Register before the flag check so a stop in between still wakes us.
        stopped.as_mut().enable();
        if self.is_stop_requested() {
            return;
        }
        tokio::select! {
            () = tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)) => {}
            () = stopped => {}
        }
    }

    /// Record the reason the run ended.
    pub async fn set_end_reason(&self, reason: SimulationEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// Get the reason the last run ended, if it has.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        *self.end_reason.lock().await
    }

    // -----------------------------------------------------------------------
    // Tick Speed
    // -----------------------------------------------------------------------

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds. Must be at least
    /// [`MIN_TICK_INTERVAL_MS`].
    ///
    /// Returns the previous interval on success, or `None` if the value
    /// was rejected.
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        Some(self.tick_interval_ms.swap(ms, Ordering::AcqRel))
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Returns `true` if `max_ticks > 0` and `ticks >= max_ticks`.
    pub const fn tick_limit_reached(&self, ticks: u64) -> bool {
        self.max_ticks > 0 && ticks >= self.max_ticks
    }

    /// Returns `true` if `max_real_time_seconds > 0` and that many seconds
    /// have passed since the current run started.
    pub fn time_limit_reached(&self) -> bool {
        self.max_real_time_seconds > 0 && self.elapsed_seconds() >= self.max_real_time_seconds
    }

    /// Restart the wall clock for a new run.
    pub fn mark_run_start(&self) {
        self.run_started_ms
            .store(Utc::now().timestamp_millis(), Ordering::Release);
    }

    /// Return the wall-clock start of the current run.
    pub fn started_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.run_started_ms.load(Ordering::Acquire))
            .unwrap_or_else(Utc::now)
    }

    /// Return elapsed seconds since the current run started.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed_ms = Utc::now()
            .timestamp_millis()
            .saturating_sub(self.run_started_ms.load(Ordering::Acquire));
        u64::try_from(elapsed_ms.max(0))
            .unwrap_or(u64::MAX)
            .checked_div(1000)
            .unwrap_or(0)
    }

    /// Get the configured max ticks.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Get the configured max real-time seconds.
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.max_real_time_seconds
    }

    /// Whether extinction ends the run.
    pub const fn stop_on_extinction(&self) -> bool {
        self.stop_on_extinction
    }

    /// Whether a repeated grid ends the run.
    pub const fn detect_cycles(&self) -> bool {
        self.detect_cycles
    }

    /// Grids remembered for cycle detection.
    pub const fn cycle_history(&self) -> usize {
        self.cycle_history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(max_ticks: u64) -> SimulationConfig {
        SimulationConfig {
            max_ticks,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn initial_state_is_running() {
        let control = DriverControl::new(100, &bounds(0));
        assert!(!control.is_paused());
        assert!(!control.is_stop_requested());
    }

    #[test]
    fn pause_and_resume() {
        let control = DriverControl::new(100, &bounds(0));
        control.pause();
        assert!(control.is_paused());
        control.resume();
        assert!(!control.is_paused());
    }

    #[test]
    fn stop_and_clear() {
        let control = DriverControl::new(100, &bounds(0));
        control.request_stop();
        assert!(control.is_stop_requested());
        control.clear_stop();
        assert!(!control.is_stop_requested());
    }

    #[test]
    fn set_tick_interval() {
        let control = DriverControl::new(100, &bounds(0));
        assert_eq!(control.set_tick_interval_ms(250), Some(100));
        assert_eq!(control.tick_interval_ms(), 250);
    }

    #[test]
    fn reject_interval_below_minimum() {
        let control = DriverControl::new(100, &bounds(0));
        assert!(control.set_tick_interval_ms(9).is_none());
        assert_eq!(control.tick_interval_ms(), 100);
        assert_eq!(control.set_tick_interval_ms(MIN_TICK_INTERVAL_MS), Some(100));
    }

    #[test]
    fn tick_limit() {
        assert!(!DriverControl::new(0, &bounds(0)).tick_limit_reached(1_000_000));
        let control = DriverControl::new(0, &bounds(10));
        assert!(!control.tick_limit_reached(9));
        assert!(control.tick_limit_reached(10));
    }

    #[test]
    fn time_limit_zero_means_unlimited() {
        let control = DriverControl::new(0, &bounds(0));
        assert!(!control.time_limit_reached());
    }

    #[tokio::test]
    async fn stop_wakes_paused_wait() {
        let control = std::sync::Arc::new(DriverControl::new(0, &bounds(0)));
        control.pause();
        let waiter = {
            let control = std::sync::Arc::clone(&control);
            tokio::spawn(async move { control.wait_if_paused().await })
        };
        control.request_stop();
        let joined = tokio::time::timeout(tokio::time::Duration::from_secs(1), waiter).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn stop_cuts_sleep_short() {
        let control = std::sync::Arc::new(DriverControl::new(60_000, &bounds(0)));
        let sleeper = {
            let control = std::sync::Arc::clone(&control);
            tokio::spawn(async move { control.sleep_interval().await })
        };
        tokio::task::yield_now().await;
        control.request_stop();
        let joined = tokio::time::timeout(tokio::time::Duration::from_secs(1), sleeper).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn run_start_resets_the_clock() {
        let control = DriverControl::new(0, &SimulationConfig {
            max_real_time_seconds: 1,
            ..SimulationConfig::default()
        });
        tokio::time::sleep(tokio::time::Duration::from_millis(1100)).await;
        assert!(control.time_limit_reached());

        let before = Utc::now();
        control.mark_run_start();
        assert!(!control.time_limit_reached());
        assert_eq!(control.elapsed_seconds(), 0);
        assert!(control.started_at().timestamp_millis() >= before.timestamp_millis());
    }

    #[tokio::test]
    async fn stop_between_runs_leaves_no_wakeup() {
        let control = DriverControl::new(50, &bounds(0));
        control.request_stop();
        control.clear_stop();

        let started = tokio::time::Instant::now();
        control.sleep_interval().await;
        assert!(started.elapsed() >= tokio::time::Duration::from_millis(40));
    }

    #[tokio::test]
    async fn end_reason_is_recorded() {
        let control = DriverControl::new(0, &bounds(0));
        assert_eq!(control.end_reason().await, None);
        control.set_end_reason(SimulationEndReason::Extinction).await;
        assert_eq!(control.end_reason().await, Some(SimulationEndReason::Extinction));
    }
}
