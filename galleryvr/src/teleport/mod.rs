// Teleport movement.
//
// In-room moves are animated with an eased interpolation rather than the
// instant position set VR comfort guides warn about for large jumps; room
// switches stay hard cuts (see the session controller).

pub mod animator;

pub use animator::{
    AnimationSample, AnimationState, TeleportAnimator, TeleportStart,
    DEFAULT_TELEPORT_DURATION_MS,
};
