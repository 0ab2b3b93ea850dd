/// Frame timing handed to every `update` call.
///
/// `elapsed_ms` is the time since the previous frame, `total_ms` the time since the game loop
/// started. Both are milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GameTime {
    /// Milliseconds since the previous frame.
    pub elapsed_ms: f64,
    /// Milliseconds since start.
    pub total_ms: f64,
}

impl GameTime {
    /// Time for a frame that took `elapsed_ms` and ended at `total_ms`.
    pub fn new(elapsed_ms: f64, total_ms: f64) -> Self {
        Self {
            elapsed_ms,
            total_ms,
        }
    }

    /// The next frame's time after `dt_ms` more milliseconds.
    ///
    /// Negative or non-finite deltas are treated as zero so the clock never runs backwards.
    pub fn advance(self, dt_ms: f64) -> Self {
        let dt = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        Self {
            elapsed_ms: dt,
            total_ms: self.total_ms + dt,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/time.rs"]
mod tests;
