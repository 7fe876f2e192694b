// Session controller: the per-tick orchestrator that owns the viewpoint.
//
// Each tick it advances any in-flight teleport, services a pending room
// mount, resolves what the user is aiming at, feeds the dwell selector, and
// acts on confirmations. All failures are contained; nothing here ever
// aborts the tick loop.

use cgmath::{Vector2, Vector3};
use tracing::{debug, info, warn};

use crate::config::{Capabilities, TourConfig};
use crate::error::{NavError, NavResult};
use crate::gaze::{aim, CameraPose, DwellSelector};
use crate::navigation::{LoadStatus, NavigationGraph, RoomContentLoader};
use crate::observer::{NavEvent, ObserverHandle, ObserverHub};
use crate::registry::TargetRegistry;
use crate::teleport::{TeleportAnimator, TeleportStart};
use crate::time::Time;

/// A discrete pointer click in normalized device coordinates.
#[derive(Clone, Copy, Debug)]
pub struct PointerClick {
    pub ndc: Vector2<f32>,
}

/// Everything the host hands the engine for one tick: the camera pose (if
/// one is available yet) and any clicks since the previous tick.
pub struct FrameInput {
    pub camera: Option<CameraPose>,
    pub clicks: Vec<PointerClick>,
}

impl FrameInput {
    /// A frame with no camera and no input; aim resolves to nothing.
    pub fn idle() -> Self {
        Self {
            camera: None,
            clicks: Vec::new(),
        }
    }

    pub fn with_camera(camera: CameraPose) -> Self {
        Self {
            camera: Some(camera),
            clicks: Vec::new(),
        }
    }

    pub fn click(mut self, ndc: Vector2<f32>) -> Self {
        self.clicks.push(PointerClick { ndc });
        self
    }
}

/// A room switch waiting on its content mount.
struct PendingSwitch {
    target: String,
    room: String,
    position: Vector3<f32>,
}

/// Orchestrates aim resolution, dwell selection, teleport animation and room
/// switching over a navigation graph. Owns the single viewpoint; the
/// animator it drives is the only thing that moves it incrementally.
pub struct SessionController<L: RoomContentLoader> {
    graph: NavigationGraph,
    registry: TargetRegistry,
    dwell: DwellSelector,
    animator: TeleportAnimator,
    observers: ObserverHub,
    loader: L,
    capabilities: Capabilities,
    animate_room_entry: bool,
    viewpoint: Vector3<f32>,
    current_room: String,
    active_target: Option<String>,
    animating_target: Option<String>,
    pending_switch: Option<PendingSwitch>,
}

impl<L: RoomContentLoader> SessionController<L> {
    /// Build a session from a validated tour declaration. The start room's
    /// targets become selectable immediately and its content mount begins;
    /// the host decides when to present the scene.
    pub fn new(config: &TourConfig, mut loader: L) -> NavResult<Self> {
        let graph = NavigationGraph::from_config(config)?;
        let start = graph
            .room(&config.start_room)
            .ok_or_else(|| NavError::UnknownRoom {
                room: config.start_room.clone(),
            })?;

        let mut registry = TargetRegistry::new();
        registry.load(start.targets().to_vec());
        let viewpoint = start.entry_position();
        let current_room = start.name().to_string();

        loader.begin_mount(&current_room);
        info!(
            "Session started in room '{}' with {} targets",
            current_room,
            registry.len()
        );

        Ok(Self {
            graph,
            registry,
            dwell: DwellSelector::new(config.dwell_duration_ms),
            animator: TeleportAnimator::new(config.teleport_duration_ms),
            observers: ObserverHub::new(),
            loader,
            capabilities: config.capabilities,
            animate_room_entry: config.animate_room_entry,
            viewpoint,
            current_room,
            active_target: None,
            animating_target: None,
            pending_switch: None,
        })
    }

    /// Advance the session one tick. Returns the tick's events; the same
    /// events are delivered to subscribed observers.
    pub fn update(&mut self, time: &Time, frame: &FrameInput) -> Vec<NavEvent> {
        let now_ms = time.total_ms();
        let mut events = Vec::new();

        self.advance_animation(now_ms, &mut events);
        self.service_pending_switch(now_ms, &mut events);

        // Click takes precedence over dwell: explicit intent wins, and at
        // most one confirmation happens per tick.
        let mut confirmed: Option<String> = None;
        if self.capabilities.pointer_click {
            confirmed = self.resolve_click(frame);
            if confirmed.is_some() {
                self.dwell.interrupt();
            }
        }

        if self.capabilities.gaze_dwell && confirmed.is_none() {
            let aimed = frame
                .camera
                .as_ref()
                .and_then(|camera| aim::resolve(&camera.gaze_ray(), &self.registry))
                .map(|target| target.name().to_string());

            confirmed = self.dwell.update(now_ms, aimed.as_deref());
            if confirmed.is_none() {
                if let Some(target) = self.dwell.aimed_target() {
                    events.push(NavEvent::DwellProgress {
                        target: target.to_string(),
                        progress: self.dwell.progress(),
                    });
                }
            }
        }

        if let Some(name) = confirmed {
            self.confirm_target(&name, now_ms, &mut events);
        }

        for event in &events {
            self.observers.publish(event);
        }
        events
    }

    /// Teleport to a named target directly, bypassing aim and dwell. This is
    /// the HUD's "go to" path; it routes through the same confirmation logic
    /// as gaze and click.
    pub fn request_teleport(&mut self, target: &str, time: &Time) -> Vec<NavEvent> {
        let mut events = Vec::new();
        self.dwell.interrupt();
        self.confirm_target(target, time.total_ms(), &mut events);
        for event in &events {
            self.observers.publish(event);
        }
        events
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&NavEvent) + 'static) -> ObserverHandle {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, handle: ObserverHandle) {
        self.observers.unsubscribe(handle);
    }

    /// Current viewer position, read by the host every tick to drive the
    /// render transform.
    pub fn viewpoint(&self) -> Vector3<f32> {
        self.viewpoint
    }

    pub fn current_room(&self) -> &str {
        &self.current_room
    }

    /// Marker matching the viewer's last arrival, for highlighting.
    pub fn active_target(&self) -> Option<&str> {
        self.active_target.as_deref()
    }

    pub fn dwell_progress(&self) -> f32 {
        self.dwell.progress()
    }

    pub fn is_switching_rooms(&self) -> bool {
        self.pending_switch.is_some()
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &NavigationGraph {
        &self.graph
    }

    fn advance_animation(&mut self, now_ms: f64, events: &mut Vec<NavEvent>) {
        if let Some(sample) = self.animator.tick(now_ms) {
            self.viewpoint = sample.position;
            if sample.completed {
                if let Some(target) = self.animating_target.take() {
                    self.set_active_target(&target);
                    events.push(NavEvent::TeleportCompleted { target });
                }
            }
        }
    }

    fn service_pending_switch(&mut self, now_ms: f64, events: &mut Vec<NavEvent>) {
        let Some(pending) = self.pending_switch.as_ref() else {
            return;
        };

        match self.loader.poll_mount(&pending.room) {
            LoadStatus::Pending => {}
            LoadStatus::Ready => {
                let pending = self.pending_switch.take().unwrap();
                self.complete_switch(pending, now_ms, events);
            }
            LoadStatus::Failed(reason) => {
                let pending = self.pending_switch.take().unwrap();
                warn!(
                    "Room '{}' failed to load: {}; staying in '{}'",
                    pending.room, reason, self.current_room
                );
                events.push(NavEvent::RoomLoadFailed {
                    room: pending.room,
                    reason,
                });
            }
        }
    }

    fn complete_switch(&mut self, pending: PendingSwitch, now_ms: f64, events: &mut Vec<NavEvent>) {
        // The old room stayed mounted and interactive while the new content
        // loaded; tear it down only now that the switch is certain.
        let old_room = std::mem::replace(&mut self.current_room, pending.room.clone());
        self.loader.unmount(&old_room);

        let targets = self
            .graph
            .room(&pending.room)
            .map(|room| room.targets().to_vec())
            .unwrap_or_default();
        self.registry.load(targets);
        self.dwell.interrupt();
        self.animator.cancel();
        self.animating_target = None;

        info!("Room switch: '{}' -> '{}'", old_room, pending.room);
        events.push(NavEvent::RoomChanged {
            room: pending.room.clone(),
        });

        if self.animate_room_entry {
            match self
                .animator
                .animate_to(self.viewpoint, pending.position, now_ms)
            {
                TeleportStart::Immediate(position) => {
                    self.viewpoint = position;
                    self.set_active_target(&pending.target);
                    events.push(NavEvent::TeleportCompleted {
                        target: pending.target,
                    });
                }
                TeleportStart::Animating => {
                    self.animating_target = Some(pending.target);
                }
            }
        } else {
            // A room switch is a hard cut, not an animated glide
            self.viewpoint = pending.position;
            self.set_active_target(&pending.target);
            events.push(NavEvent::TeleportCompleted {
                target: pending.target,
            });
        }
    }

    fn resolve_click(&self, frame: &FrameInput) -> Option<String> {
        let camera = frame.camera.as_ref()?;
        for click in &frame.clicks {
            if let Some(target) = aim::resolve(&camera.pointer_ray(click.ndc), &self.registry) {
                debug!("Click confirmed target '{}'", target.name());
                return Some(target.name().to_string());
            }
        }
        None
    }

    fn confirm_target(&mut self, name: &str, now_ms: f64, events: &mut Vec<NavEvent>) {
        if let Some(pending) = &self.pending_switch {
            warn!(
                "Ignoring confirmation of '{}': switch to '{}' in flight",
                name, pending.room
            );
            events.push(NavEvent::TransitionRejected {
                target: name.to_string(),
                reason: NavError::TransitionInFlight {
                    room: pending.room.clone(),
                }
                .to_string(),
            });
            return;
        }

        let Some(target) = self.registry.find(name) else {
            warn!("Confirmation for unknown target '{}'", name);
            events.push(NavEvent::TransitionRejected {
                target: name.to_string(),
                reason: NavError::UnknownTarget {
                    target: name.to_string(),
                }
                .to_string(),
            });
            return;
        };

        if !target.is_enabled() {
            events.push(NavEvent::TransitionRejected {
                target: name.to_string(),
                reason: "transition disabled by configuration".to_string(),
            });
            return;
        }

        let destination = match self.graph.resolve_destination(&self.current_room, target) {
            Ok(destination) => destination,
            Err(err) => {
                warn!("Cannot resolve destination for '{}': {}", name, err);
                events.push(NavEvent::TransitionRejected {
                    target: name.to_string(),
                    reason: err.to_string(),
                });
                return;
            }
        };

        if destination.changes_room {
            if !self.capabilities.room_switching {
                events.push(NavEvent::TransitionRejected {
                    target: name.to_string(),
                    reason: "room switching disabled".to_string(),
                });
                return;
            }

            // A new switch cancels any in-flight teleport animation
            self.animator.cancel();
            self.animating_target = None;

            info!("Loading room '{}' for target '{}'", destination.room, name);
            self.loader.begin_mount(&destination.room);
            events.push(NavEvent::RoomLoadStarted {
                room: destination.room.clone(),
            });
            self.pending_switch = Some(PendingSwitch {
                target: name.to_string(),
                room: destination.room,
                position: destination.position,
            });
            return;
        }

        match self
            .animator
            .animate_to(self.viewpoint, destination.position, now_ms)
        {
            TeleportStart::Immediate(position) => {
                self.viewpoint = position;
                self.animating_target = None;
                self.set_active_target(name);
                events.push(NavEvent::TeleportStarted {
                    target: name.to_string(),
                });
                events.push(NavEvent::TeleportCompleted {
                    target: name.to_string(),
                });
            }
            TeleportStart::Animating => {
                // Supersedes any previous animation; its completion is gone
                self.animating_target = Some(name.to_string());
                events.push(NavEvent::TeleportStarted {
                    target: name.to_string(),
                });
            }
        }
    }

    fn set_active_target(&mut self, name: &str) {
        if let Some(old) = self.active_target.take() {
            self.registry.set_active(&old, false);
        }
        self.registry.set_active(name, true);
        self.active_target = Some(name.to_string());
    }
}
