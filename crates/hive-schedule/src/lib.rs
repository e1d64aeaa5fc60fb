//! `hive-schedule`: fixed-timestep scheduling decoupled from render rate.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                   |
//! |------------------|------------------------------------------------------------|
//! | [`engine`]       | `FixedTimestepEngine`, `EngineConfig`, `FrameReport`       |
//! | [`handler`]      | `StepHandler` trait, `Callbacks` closure adapter           |
//! | [`snapshot`]     | `Snapshot`, `EntityState`, `StateProperty`                 |
//! | [`metrics`]      | `EngineMetrics`                                            |
//! | [`interpolator`] | `Interpolator` - exponential smoothing toward targets      |
//! | [`timer`]        | `DeltaTimer` (fixed rate), `Cooldown` (one-shot)           |
//! | [`clock`]        | `TimeSource`, `MonotonicClock`, `ManualClock`              |
//! | [`error`]        | `ScheduleError`, `ScheduleResult<T>`                       |
//!
//! # Frame algorithm (summary)
//!
//! ```text
//! dt = min(now - last, max_frame_dt)
//! accumulator += dt
//! while accumulator >= fixed_step:
//!     if steps == max_substeps: drop accumulator, count a skipped frame, stop
//!     capture "previous" snapshot (first step only)
//!     fixed_update(fixed_step); accumulator -= fixed_step
//! alpha = accumulator / fixed_step; capture "current" snapshot
//! render(alpha); late_update(dt)
//! ```
//!
//! The host's per-frame callback drives [`FixedTimestepEngine::frame`] with
//! a timestamp; the engine never owns a thread or a timer.

pub mod clock;
pub mod engine;
pub mod error;
pub mod handler;
pub mod interpolator;
pub mod metrics;
pub mod snapshot;
pub mod timer;


pub use clock::{ManualClock, MonotonicClock, TimeSource};
pub use engine::{EngineConfig, FixedTimestepEngine, FrameReport};
pub use error::{ScheduleError, ScheduleResult};
pub use handler::{Callbacks, StepHandler};
pub use interpolator::Interpolator;
pub use metrics::EngineMetrics;
pub use snapshot::{EntityState, Snapshot, StateProperty};
pub use timer::{Cooldown, DeltaTimer};
