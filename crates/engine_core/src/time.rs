//! Simulation clock for the game loop.

/// Longest step a single tick may integrate, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Tracks simulated time and clamps host frame deltas.
///
/// The host hands over whatever its frame callback measured; slow frames
/// (tab stalls, breakpoints) are capped at `max_delta` and nonsense values
/// (negative, NaN) collapse to zero so the simulation never steps backwards.
#[derive(Debug, Clone)]
pub struct Time {
    /// Clamped duration of the last step in seconds.
    delta: f32,
    /// Total simulated time in seconds.
    elapsed: f64,
    /// Steps taken since creation or the last reset.
    frame_count: u64,
    /// Upper bound for a single step.
    max_delta: f32,
}

impl Default for Time {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA)
    }
}

impl Time {
    /// Create a clock that caps each step at `max_delta` seconds.
    pub fn new(max_delta: f32) -> Self {
        Self {
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
            max_delta: max_delta.max(0.0),
        }
    }

    /// Clamp a raw host delta into `[0, max_delta]`.
    pub fn clamp_delta(&self, raw: f32) -> f32 {
        if raw.is_nan() || raw <= 0.0 {
            0.0
        } else {
            raw.min(self.max_delta)
        }
    }

    /// Advance by a raw host delta and return the clamped step actually taken.
    pub fn advance(&mut self, raw: f32) -> f32 {
        self.delta = self.clamp_delta(raw);
        self.elapsed += self.delta as f64;
        self.frame_count += 1;
        self.delta
    }

    /// Get total simulated time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Maximum step length in seconds.
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }
}
