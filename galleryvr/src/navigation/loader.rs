/// Mount progress reported by the host's content loader, polled once per
/// tick while a room switch is in flight.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadStatus {
    Pending,
    Ready,
    Failed(String),
}

/// External collaborator that mounts and unmounts room content (models,
/// lighting, cosmetic meshes). Asynchronous and fallible; the engine never
/// blocks on it and ignores results for superseded requests.
pub trait RoomContentLoader {
    /// Start loading a room's content. Called at most once per switch.
    fn begin_mount(&mut self, room: &str);

    /// Report progress for a previously begun mount.
    fn poll_mount(&mut self, room: &str) -> LoadStatus;

    /// Tear down a room's mounted content.
    fn unmount(&mut self, room: &str);
}

/// Loader whose mounts complete on the first poll. Useful for tests and for
/// hosts that preload all room content up front.
#[derive(Default)]
pub struct ImmediateLoader;

impl RoomContentLoader for ImmediateLoader {
    fn begin_mount(&mut self, _room: &str) {}

    fn poll_mount(&mut self, _room: &str) -> LoadStatus {
        LoadStatus::Ready
    }

    fn unmount(&mut self, _room: &str) {}
}
