use cgmath::{InnerSpace, Vector3};

/// Default in-room teleport duration
pub const DEFAULT_TELEPORT_DURATION_MS: f64 = 600.0;

/// Start/end positions closer than this skip the animation entirely
const TELEPORT_EPSILON: f32 = 1e-3;

/// One in-flight teleport. At most one exists system-wide; starting a new
/// one replaces it without ever signaling the old completion.
#[derive(Clone, Debug)]
pub struct AnimationState {
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
    pub start_ms: f64,
    pub duration_ms: f64,
}

/// Outcome of an `animate_to` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TeleportStart {
    /// Destination within epsilon of the current position: the viewpoint is
    /// set immediately and completion is synchronous.
    Immediate(Vector3<f32>),
    /// Animation started; positions arrive through `tick`.
    Animating,
}

/// Per-tick sample of an active animation.
#[derive(Clone, Copy, Debug)]
pub struct AnimationSample {
    pub position: Vector3<f32>,
    pub completed: bool,
}

/// Interpolates the viewpoint toward a destination over a fixed duration
/// with an ease-in-out-quadratic curve. Cancelable and replaceable
/// mid-flight; last call wins, nothing is queued.
pub struct TeleportAnimator {
    duration_ms: f64,
    animation: Option<AnimationState>,
}

impl TeleportAnimator {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms: duration_ms.max(0.0),
            animation: None,
        }
    }

    /// Begin moving from `current` to `destination`. A prior animation is
    /// superseded: the new one starts from the mid-flight position the
    /// caller observed, and the old completion never fires.
    pub fn animate_to(
        &mut self,
        current: Vector3<f32>,
        destination: Vector3<f32>,
        now_ms: f64,
    ) -> TeleportStart {
        if (destination - current).magnitude() <= TELEPORT_EPSILON || self.duration_ms <= 0.0 {
            self.animation = None;
            return TeleportStart::Immediate(destination);
        }

        self.animation = Some(AnimationState {
            start: current,
            end: destination,
            start_ms: now_ms,
            duration_ms: self.duration_ms,
        });
        TeleportStart::Animating
    }

    /// Sample the active animation. Returns `None` when idle. The final
    /// sample lands exactly on the endpoint and reports completion once;
    /// after that the animator is idle again.
    pub fn tick(&mut self, now_ms: f64) -> Option<AnimationSample> {
        let animation = self.animation.as_ref()?;

        let elapsed = now_ms - animation.start_ms;
        if elapsed >= animation.duration_ms {
            let end = animation.end;
            self.animation = None;
            return Some(AnimationSample {
                position: end,
                completed: true,
            });
        }

        let t = (elapsed / animation.duration_ms).max(0.0) as f32;
        let position = lerp(animation.start, animation.end, ease_in_out_quad(t));
        Some(AnimationSample {
            position,
            completed: false,
        })
    }

    /// Drop any in-flight animation without completing it.
    pub fn cancel(&mut self) {
        self.animation = None;
    }

    pub fn is_active(&self) -> bool {
        self.animation.is_some()
    }

    pub fn state(&self) -> Option<&AnimationState> {
        self.animation.as_ref()
    }
}

impl Default for TeleportAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_TELEPORT_DURATION_MS)
    }
}

fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

fn lerp(a: Vector3<f32>, b: Vector3<f32>, t: f32) -> Vector3<f32> {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn test_midpoint_sample_is_deterministic() {
        let mut animator = TeleportAnimator::new(1000.0);
        animator.animate_to(vec3(0.0, 0.0, 0.0), vec3(10.0, 0.0, 0.0), 0.0);

        // eased(0.5) == 0.5, so the midpoint sample is exactly halfway
        let sample = animator.tick(500.0).expect("active");
        assert!(!sample.completed);
        assert!((sample.position.x - 5.0).abs() < 1e-5);
        assert_eq!(sample.position.y, 0.0);
    }

    #[test]
    fn test_endpoint_is_exact_and_completes_once() {
        let mut animator = TeleportAnimator::new(1000.0);
        animator.animate_to(vec3(0.0, 0.0, 0.0), vec3(10.0, 0.0, 0.0), 0.0);

        let sample = animator.tick(1000.0).expect("final sample");
        assert!(sample.completed);
        assert_eq!(sample.position, vec3(10.0, 0.0, 0.0));

        // Completion fired; the animator is idle now
        assert!(animator.tick(1016.0).is_none());
        assert!(!animator.is_active());
    }

    #[test]
    fn test_easing_is_slow_in_slow_out() {
        let mut animator = TeleportAnimator::new(1000.0);
        animator.animate_to(vec3(0.0, 0.0, 0.0), vec3(10.0, 0.0, 0.0), 0.0);

        // eased(0.25) == 0.125: first quarter covers an eighth of the path
        let early = animator.tick(250.0).expect("active");
        assert!((early.position.x - 1.25).abs() < 1e-4);

        // eased(0.75) == 0.875, symmetric at the far end
        let late = animator.tick(750.0).expect("active");
        assert!((late.position.x - 8.75).abs() < 1e-4);
    }

    #[test]
    fn test_supersession_starts_from_midflight_position() {
        let mut animator = TeleportAnimator::new(1000.0);
        animator.animate_to(vec3(0.0, 0.0, 0.0), vec3(10.0, 0.0, 0.0), 0.0);

        let midflight = animator.tick(300.0).expect("active").position;
        assert!(midflight.x > 0.0 && midflight.x < 10.0);

        // Start B from the position A had reached
        animator.animate_to(midflight, vec3(0.0, 0.0, 8.0), 300.0);
        let state = animator.state().expect("replaced animation");
        assert_eq!(state.start, midflight);
        assert_eq!(state.end, vec3(0.0, 0.0, 8.0));

        // A's completion never fires: the only completion is B's endpoint
        let done = animator.tick(1300.0).expect("final sample");
        assert!(done.completed);
        assert_eq!(done.position, vec3(0.0, 0.0, 8.0));
        assert!(animator.tick(1400.0).is_none());
    }

    #[test]
    fn test_zero_distance_resolves_immediately() {
        let mut animator = TeleportAnimator::new(1000.0);
        let here = vec3(2.0, 1.6, -3.0);

        let start = animator.animate_to(here, here, 0.0);
        assert_eq!(start, TeleportStart::Immediate(here));
        assert!(!animator.is_active());
        assert!(animator.tick(16.0).is_none());
    }

    #[test]
    fn test_cancel_drops_animation_without_completion() {
        let mut animator = TeleportAnimator::new(1000.0);
        animator.animate_to(vec3(0.0, 0.0, 0.0), vec3(10.0, 0.0, 0.0), 0.0);
        animator.cancel();
        assert!(animator.tick(2000.0).is_none());
    }
}
