use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};
use crate::gaze::dwell::DEFAULT_DWELL_DURATION_MS;
use crate::teleport::DEFAULT_TELEPORT_DURATION_MS;

/// Marker hit-volume radius used when a target declares none
pub const DEFAULT_MARKER_RADIUS: f32 = 0.35;

/// Standing camera height; room entry positions default to it
pub const DEFAULT_CAMERA_HEIGHT: f32 = 1.6;

/// Which input paths the engine responds to. One engine serves the
/// gaze-only, click-only and hybrid tour variants through these flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub gaze_dwell: bool,
    pub pointer_click: bool,
    pub room_switching: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            gaze_dwell: true,
            pointer_click: true,
            room_switching: true,
        }
    }
}

/// Declarative tour table: timing knobs, capability flags, and the
/// rooms → targets → transitions graph. Static data, not logic; loaded once
/// and validated by `NavigationGraph::from_config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourConfig {
    #[serde(default = "default_dwell_duration_ms")]
    pub dwell_duration_ms: f64,

    #[serde(default = "default_teleport_duration_ms")]
    pub teleport_duration_ms: f64,

    /// Ease into the entry position after a room mount instead of the
    /// default hard cut
    #[serde(default)]
    pub animate_room_entry: bool,

    #[serde(default)]
    pub capabilities: Capabilities,

    pub start_room: String,

    pub rooms: Vec<RoomDecl>,
}

impl TourConfig {
    pub fn from_json(text: &str) -> NavResult<Self> {
        serde_json::from_str(text).map_err(|err| NavError::Configuration {
            item: "tour".to_string(),
            reason: err.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDecl {
    pub name: String,

    /// Opaque key handed to the content loader when this room mounts
    #[serde(default)]
    pub content: Option<String>,

    #[serde(default = "default_entry_position")]
    pub entry_position: [f32; 3],

    #[serde(default)]
    pub targets: Vec<TargetDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDecl {
    pub name: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Marker position in world space
    pub position: [f32; 3],

    #[serde(default = "default_marker_radius")]
    pub radius: f32,

    #[serde(default)]
    pub changes_room: bool,

    /// Required when `changes_room` is true; validated at load time
    #[serde(default)]
    pub destination_room: Option<String>,

    /// Where the viewer lands. Defaults to the marker position for in-room
    /// moves and to the destination room's entry position for switches.
    #[serde(default)]
    pub destination_position: Option<[f32; 3]>,
}

fn default_dwell_duration_ms() -> f64 {
    DEFAULT_DWELL_DURATION_MS
}

fn default_teleport_duration_ms() -> f64 {
    DEFAULT_TELEPORT_DURATION_MS
}

fn default_marker_radius() -> f32 {
    DEFAULT_MARKER_RADIUS
}

fn default_entry_position() -> [f32; 3] {
    [0.0, DEFAULT_CAMERA_HEIGHT, 0.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_tour() {
        let config = TourConfig::from_json(
            r#"{
                "start_room": "Gallery",
                "rooms": [
                    {
                        "name": "Gallery",
                        "targets": [
                            { "name": "Entrance", "position": [-1.34, 1.6, 5.23] },
                            { "name": "CentralHall", "position": [1.54, 1.6, 10.0] }
                        ]
                    }
                ]
            }"#,
        )
        .expect("valid tour");

        assert_eq!(config.dwell_duration_ms, 2500.0);
        assert_eq!(config.teleport_duration_ms, 600.0);
        assert!(config.capabilities.gaze_dwell);
        assert!(!config.animate_room_entry);
        assert_eq!(config.rooms.len(), 1);

        let target = &config.rooms[0].targets[0];
        assert_eq!(target.radius, DEFAULT_MARKER_RADIUS);
        assert!(!target.changes_room);
        assert_eq!(config.rooms[0].entry_position[1], DEFAULT_CAMERA_HEIGHT);
    }

    #[test]
    fn test_parse_room_switch_target() {
        let config = TourConfig::from_json(
            r#"{
                "start_room": "Gallery",
                "rooms": [
                    {
                        "name": "Gallery",
                        "targets": [
                            {
                                "name": "ToSideWing",
                                "position": [-6.77, 1.6, 3.64],
                                "changes_room": true,
                                "destination_room": "SideWing"
                            }
                        ]
                    },
                    { "name": "SideWing", "entry_position": [0.0, 1.6, -2.0] }
                ]
            }"#,
        )
        .expect("valid tour");

        let target = &config.rooms[0].targets[0];
        assert!(target.changes_room);
        assert_eq!(target.destination_room.as_deref(), Some("SideWing"));
        assert!(target.destination_position.is_none());
    }

    #[test]
    fn test_malformed_json_is_a_configuration_error() {
        let err = TourConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, NavError::Configuration { .. }));
    }
}
