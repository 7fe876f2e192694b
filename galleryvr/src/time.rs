use std::time::Duration;

/// Frame timing passed into every `update` call.
///
/// `total` is time since the session started; `elapsed` is the delta since
/// the previous frame. Dwell and animation math works in total milliseconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct Time {
    pub total: Duration,
    pub elapsed: Duration,
}

impl Time {
    pub fn new(total: Duration, elapsed: Duration) -> Self {
        Self { total, elapsed }
    }

    /// Build a frame time from a total-milliseconds timestamp.
    pub fn from_millis(total_ms: f64) -> Self {
        Self {
            total: Duration::from_secs_f64(total_ms.max(0.0) / 1000.0),
            elapsed: Duration::ZERO,
        }
    }

    pub fn total_ms(&self) -> f64 {
        self.total.as_secs_f64() * 1000.0
    }
}
