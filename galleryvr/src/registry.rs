use cgmath::Vector3;

/// Where a confirmed target sends the viewer.
///
/// The room-change case carries its destination room by construction, so a
/// validated target can never claim a room switch without naming the room.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionSpec {
    /// Relocate within the current room (animated teleport)
    WithinRoom { destination: Vector3<f32> },
    /// Switch to another room, arriving at `destination` inside it
    ToRoom {
        room: String,
        destination: Vector3<f32>,
    },
}

impl TransitionSpec {
    pub fn changes_room(&self) -> bool {
        matches!(self, TransitionSpec::ToRoom { .. })
    }
}

/// A selectable marker in world space.
///
/// Immutable after creation except for the visual-state flag (driven through
/// `TargetRegistry::set_active`) and the enabled flag, which load-time
/// validation clears for misconfigured transitions.
#[derive(Clone, Debug)]
pub struct Target {
    name: String,
    label: Option<String>,
    position: Vector3<f32>,
    radius: f32,
    transition: TransitionSpec,
    active: bool,
    enabled: bool,
}

impl Target {
    pub fn new(
        name: impl Into<String>,
        position: Vector3<f32>,
        radius: f32,
        transition: TransitionSpec,
    ) -> Self {
        Self {
            name: name.into(),
            label: None,
            position,
            radius,
            transition,
            active: false,
            enabled: true,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn transition(&self) -> &TransitionSpec {
        &self.transition
    }

    /// Visual highlight state (normal vs. active marker)
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Disabled targets stay visible but can never confirm
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn disable(&mut self) {
        self.enabled = false;
    }
}

/// Holds the selectable targets for the currently mounted room.
///
/// The set is replaced wholesale on room change; iteration order is the
/// declaration order of the room's target list, which is also the
/// deterministic tie-break order for equidistant hits.
#[derive(Default)]
pub struct TargetRegistry {
    targets: Vec<Target>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active target set atomically. Old targets are discarded;
    /// the new ones are selectable immediately.
    pub fn load(&mut self, targets: Vec<Target>) {
        self.targets = targets;
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn all(&self) -> &[Target] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Single entry point for visual-state flips. Idempotent; unknown names
    /// are ignored so stale highlight requests after a room switch are safe.
    pub fn set_active(&mut self, name: &str, active: bool) {
        if let Some(target) = self.targets.iter_mut().find(|t| t.name == name) {
            target.active = active;
        }
    }
}
