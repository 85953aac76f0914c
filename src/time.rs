//! Clocks
//!
//! `now_seconds` is the wall clock hosts pass in `FrameInput::now`;
//! [`FrameClock`] is the per-effect accumulator that advances a fixed amount
//! every frame regardless of the real refresh rate.

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Monotonic per-frame time accumulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    t: f64,
    step: f64,
}

impl FrameClock {
    pub fn new(step: f64) -> Self {
        Self { t: 0.0, step }
    }

    /// Advance one frame and return the new time.
    #[inline]
    pub fn tick(&mut self) -> f64 {
        self.t += self.step;
        self.t
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.t
    }
}
