use tracing::trace;

/// Default dwell duration before a gazed target confirms, from the original
/// gallery's 2.5 second gaze timer.
pub const DEFAULT_DWELL_DURATION_MS: f64 = 2500.0;

#[derive(Clone, Debug, PartialEq)]
enum DwellPhase {
    Idle,
    Acquiring { target: String, start_ms: f64 },
}

/// Timed state machine turning a stream of per-tick aim samples into
/// selection confirmations.
///
/// Fed once per tick with `(now, aimed_target)`. A confirmation is transient:
/// it is returned exactly once and the selector drops back to idle. Clicks
/// bypass the timer entirely; the caller routes them and calls `interrupt`.
pub struct DwellSelector {
    phase: DwellPhase,
    duration_ms: f64,
    progress: f32,
}

impl DwellSelector {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            phase: DwellPhase::Idle,
            duration_ms: duration_ms.max(0.0),
            progress: 0.0,
        }
    }

    /// Advance the state machine one tick. Returns the confirmed target name
    /// when sustained aim reaches the dwell duration.
    pub fn update(&mut self, now_ms: f64, aimed: Option<&str>) -> Option<String> {
        let Some(aimed) = aimed else {
            self.reset();
            return None;
        };

        match &self.phase {
            DwellPhase::Acquiring { target, start_ms } if target == aimed => {
                let elapsed = now_ms - start_ms;
                self.progress = if self.duration_ms <= 0.0 {
                    1.0
                } else {
                    ((elapsed / self.duration_ms).min(1.0)) as f32
                };

                if elapsed >= self.duration_ms {
                    let confirmed = target.clone();
                    trace!("Dwell confirmed target '{}'", confirmed);
                    self.reset();
                    return Some(confirmed);
                }
                None
            }
            _ => {
                // New target (or first target after idle): restart the timer
                trace!("Dwell acquiring target '{}'", aimed);
                self.phase = DwellPhase::Acquiring {
                    target: aimed.to_string(),
                    start_ms: now_ms,
                };
                self.progress = 0.0;
                None
            }
        }
    }

    /// Abandon any acquisition in progress. Used when a click confirms on
    /// the same tick and when the target set is replaced under the selector.
    pub fn interrupt(&mut self) {
        self.reset();
    }

    /// Acquisition progress in [0, 1]; reads 0 outside of acquisition.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Target currently being acquired, if any.
    pub fn aimed_target(&self) -> Option<&str> {
        match &self.phase {
            DwellPhase::Acquiring { target, .. } => Some(target),
            DwellPhase::Idle => None,
        }
    }

    fn reset(&mut self) {
        self.phase = DwellPhase::Idle;
        self.progress = 0.0;
    }
}

impl Default for DwellSelector {
    fn default() -> Self {
        Self::new(DEFAULT_DWELL_DURATION_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_increases_until_confirmation() {
        let mut dwell = DwellSelector::new(2500.0);

        assert_eq!(dwell.update(0.0, Some("a")), None);
        assert_eq!(dwell.progress(), 0.0);

        let mut last_progress = 0.0;
        for now in [500.0, 1000.0, 1500.0, 2000.0] {
            assert_eq!(dwell.update(now, Some("a")), None);
            assert!(dwell.progress() > last_progress);
            last_progress = dwell.progress();
        }

        // Exactly one confirmation at the threshold
        assert_eq!(dwell.update(2500.0, Some("a")), Some("a".to_string()));
        // The next tick starts a fresh acquisition, not a second confirmation
        assert_eq!(dwell.update(2516.0, Some("a")), None);
        assert_eq!(dwell.progress(), 0.0);
    }

    #[test]
    fn test_switching_targets_resets_progress() {
        let mut dwell = DwellSelector::new(2500.0);

        dwell.update(0.0, Some("a"));
        dwell.update(1000.0, Some("a"));
        assert!(dwell.progress() > 0.0);

        // Switch to b: progress restarts from zero
        dwell.update(1000.0, Some("b"));
        assert_eq!(dwell.progress(), 0.0);
        assert_eq!(dwell.aimed_target(), Some("b"));

        // b is not confirmed until its own full dwell elapses
        assert_eq!(dwell.update(3000.0, Some("b")), None);
        assert_eq!(dwell.update(3500.0, Some("b")), Some("b".to_string()));
    }

    #[test]
    fn test_losing_aim_clears_progress() {
        let mut dwell = DwellSelector::new(2500.0);

        dwell.update(0.0, Some("a"));
        dwell.update(2000.0, Some("a"));
        assert!(dwell.progress() > 0.7);

        dwell.update(2100.0, None);
        assert_eq!(dwell.progress(), 0.0);
        assert_eq!(dwell.aimed_target(), None);
    }

    #[test]
    fn test_interrupt_resets_state() {
        let mut dwell = DwellSelector::new(2500.0);

        dwell.update(0.0, Some("a"));
        dwell.update(2400.0, Some("a"));
        dwell.interrupt();

        assert_eq!(dwell.progress(), 0.0);
        // Aim continuing after the interrupt starts over
        assert_eq!(dwell.update(2500.0, Some("a")), None);
        assert_eq!(dwell.update(4000.0, Some("a")), None);
        assert_eq!(dwell.update(5000.0, Some("a")), Some("a".to_string()));
    }

    #[test]
    fn test_zero_duration_confirms_on_second_sample() {
        let mut dwell = DwellSelector::new(0.0);
        assert_eq!(dwell.update(0.0, Some("a")), None);
        assert_eq!(dwell.update(16.0, Some("a")), Some("a".to_string()));
    }
}
