// Gaze/pointer teleport-navigation engine for virtual gallery tours.
//
// The engine owns selection (aim + dwell), the room navigation graph, and
// the viewpoint animation; rendering, asset loading and HUD drawing belong
// to the host, which talks to the engine through `FrameInput`, the
// `RoomContentLoader` trait, and the observer channel.

pub mod config;
pub mod error;
pub mod gaze;
pub mod navigation;
pub mod observer;
pub mod registry;
pub mod session;
pub mod teleport;
pub mod time;

pub use config::{Capabilities, TourConfig, DEFAULT_CAMERA_HEIGHT, DEFAULT_MARKER_RADIUS};
pub use error::{NavError, NavResult};
pub use gaze::{CameraPose, DwellSelector, Ray, DEFAULT_DWELL_DURATION_MS};
pub use navigation::{
    Destination, ImmediateLoader, LoadStatus, NavigationGraph, Room, RoomContentLoader,
};
pub use observer::{NavEvent, ObserverHandle, ObserverHub};
pub use registry::{Target, TargetRegistry, TransitionSpec};
pub use session::{FrameInput, PointerClick, SessionController};
pub use teleport::{TeleportAnimator, DEFAULT_TELEPORT_DURATION_MS};
pub use time::Time;
