//! Life engine, configuration and the periodic driver for the Petri Life engine.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `petri-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- [`DriverControl`], shared pause/stop/speed state and
//!   run bounds.
//! - [`cycle`] -- [`CycleDetector`] for still lifes and oscillators.
//! - [`engine`] -- [`LifeEngine`], double-buffered B3/S23 stepping with
//!   population and generation tracking.
//! - [`runner`] -- [`run_driver`] and the [`PeriodicDriver`] task owner.
//!
//! [`DriverControl`]: control::DriverControl
//! [`CycleDetector`]: cycle::CycleDetector
//! [`LifeEngine`]: engine::LifeEngine
//! [`run_driver`]: runner::run_driver
//! [`PeriodicDriver`]: runner::PeriodicDriver

pub mod config;
pub mod control;
pub mod cycle;
pub mod engine;
pub mod runner;
