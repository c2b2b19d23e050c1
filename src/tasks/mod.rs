//! Background Tasks Module
//!
//! Timer-driven work that runs for the life of the process.
//!
//! # Tasks
//! - Sweep: eagerly purges expired cache entries, rate windows and
//!   compression artifacts at a configured interval

mod sweep;

pub use sweep::spawn_sweep_task;
