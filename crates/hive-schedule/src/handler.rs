//! The callbacks a [`FixedTimestepEngine`][crate::FixedTimestepEngine]
//! invokes each frame.

use crate::Snapshot;

/// Receiver of engine callbacks.
///
/// Only [`fixed_update`][Self::fixed_update] is required.  The render,
/// late-update and capture hooks default to no-ops so a pure simulation
/// driver does not need to implement them.
pub trait StepHandler {
    /// Advance the simulation by exactly `dt` (always the engine's fixed step).
    fn fixed_update(&mut self, dt: f64);

    /// Draw the current frame.  `alpha` in `[0, 1)` is how far wall-clock
    /// time has progressed past the last fixed update, in steps.
    fn render(&mut self, _alpha: f64) {}

    /// Runs after render with the raw (clamped) frame delta.  For effects
    /// that follow physics but need no determinism.
    fn late_update(&mut self, _dt: f64) {}

    /// Record the interpolatable state of every entity into `snapshot`.
    fn capture(&self, _snapshot: &mut Snapshot) {}
}

type Hook<'a> = Box<dyn FnMut(f64) + 'a>;

/// A [`StepHandler`] assembled from closures, for hosts that configure the
/// loop with `on_update` / `on_render` / `on_late_update` callbacks.
///
/// ```rust
/// use hive_schedule::{Callbacks, EngineConfig, FixedTimestepEngine};
///
/// let mut steps = 0;
/// let mut engine = FixedTimestepEngine::new(EngineConfig::default()).unwrap();
/// {
///     let mut cb = Callbacks::new(|_dt| steps += 1);
///     engine.start(0.0);
///     engine.frame(0.04, &mut cb);
/// }
/// assert_eq!(steps, 2);
/// ```
pub struct Callbacks<'a> {
    on_update:      Hook<'a>,
    on_render:      Option<Hook<'a>>,
    on_late_update: Option<Hook<'a>>,
}

impl<'a> Callbacks<'a> {
    pub fn new(on_update: impl FnMut(f64) + 'a) -> Self {
        Self {
            on_update:      Box::new(on_update),
            on_render:      None,
            on_late_update: None,
        }
    }

    pub fn on_render(mut self, f: impl FnMut(f64) + 'a) -> Self {
        self.on_render = Some(Box::new(f));
        self
    }

    pub fn on_late_update(mut self, f: impl FnMut(f64) + 'a) -> Self {
        self.on_late_update = Some(Box::new(f));
        self
    }
}

impl StepHandler for Callbacks<'_> {
    fn fixed_update(&mut self, dt: f64) {
        (self.on_update)(dt);
    }

    fn render(&mut self, alpha: f64) {
        if let Some(f) = self.on_render.as_mut() {
            f(alpha);
        }
    }

    fn late_update(&mut self, dt: f64) {
        if let Some(f) = self.on_late_update.as_mut() {
            f(dt);
        }
    }
}
