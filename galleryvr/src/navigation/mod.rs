// Navigation graph: the finite map of rooms, their target sets, and the
// transition metadata that turns a confirmed target into a destination.

pub mod loader;

use std::collections::HashSet;

use cgmath::{vec3, Vector3};
use tracing::warn;

use crate::config::{RoomDecl, TargetDecl, TourConfig};
use crate::error::{NavError, NavResult};
use crate::registry::{Target, TransitionSpec};

pub use loader::{ImmediateLoader, LoadStatus, RoomContentLoader};

/// A discrete navigable area: entry position, target set, and the content
/// key the external loader mounts.
pub struct Room {
    name: String,
    entry_position: Vector3<f32>,
    content: Option<String>,
    targets: Vec<Target>,
}

impl Room {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry_position(&self) -> Vector3<f32> {
        self.entry_position
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Target templates for this room, cloned into the registry on mount.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }
}

/// Where a confirmed target resolves to.
#[derive(Clone, Debug, PartialEq)]
pub struct Destination {
    pub room: String,
    pub position: Vector3<f32>,
    pub changes_room: bool,
}

/// Validated mapping from room identifier to room. Built once from the tour
/// declaration; structural problems are hard errors, per-transition problems
/// disable the offending target and are kept as issues for inspection.
pub struct NavigationGraph {
    rooms: Vec<Room>,
    issues: Vec<NavError>,
}

impl NavigationGraph {
    pub fn from_config(config: &TourConfig) -> NavResult<Self> {
        if config.rooms.is_empty() {
            return Err(NavError::Configuration {
                item: "tour".to_string(),
                reason: "no rooms declared".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for room in &config.rooms {
            if !seen.insert(room.name.as_str()) {
                return Err(NavError::Configuration {
                    item: room.name.clone(),
                    reason: "duplicate room name".to_string(),
                });
            }
        }

        if !seen.contains(config.start_room.as_str()) {
            return Err(NavError::Configuration {
                item: config.start_room.clone(),
                reason: "start room is not declared".to_string(),
            });
        }

        let room_names: HashSet<String> = seen.iter().map(|s| s.to_string()).collect();
        let mut issues = Vec::new();
        let rooms = config
            .rooms
            .iter()
            .map(|decl| build_room(decl, config, &room_names, &mut issues))
            .collect();

        Ok(Self { rooms, issues })
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.room(name).is_some()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Configuration problems found at load time. The offending transitions
    /// are already disabled; these are kept for the host to surface.
    pub fn issues(&self) -> &[NavError] {
        &self.issues
    }

    /// Resolve where a confirmed target sends the viewer. Within-room moves
    /// stay in `current_room`; room changes are re-validated here so a stale
    /// target can never switch to an unknown room.
    pub fn resolve_destination(
        &self,
        current_room: &str,
        target: &Target,
    ) -> NavResult<Destination> {
        match target.transition() {
            TransitionSpec::WithinRoom { destination } => Ok(Destination {
                room: current_room.to_string(),
                position: *destination,
                changes_room: false,
            }),
            TransitionSpec::ToRoom { room, destination } => {
                if !self.contains(room) {
                    return Err(NavError::UnknownRoom { room: room.clone() });
                }
                Ok(Destination {
                    room: room.clone(),
                    position: *destination,
                    changes_room: true,
                })
            }
        }
    }
}

fn build_room(
    decl: &RoomDecl,
    config: &TourConfig,
    room_names: &HashSet<String>,
    issues: &mut Vec<NavError>,
) -> Room {
    if decl.targets.is_empty() {
        let issue = NavError::Configuration {
            item: decl.name.clone(),
            reason: "room has no targets".to_string(),
        };
        warn!("{}", issue);
        issues.push(issue);
    }

    let mut targets: Vec<Target> = Vec::with_capacity(decl.targets.len());
    for target_decl in &decl.targets {
        let mut target = build_target(target_decl, config, room_names, issues);
        if targets.iter().any(|t| t.name() == target.name()) {
            let issue = NavError::Configuration {
                item: target_decl.name.clone(),
                reason: format!("duplicate target name in room '{}'", decl.name),
            };
            warn!("{}", issue);
            issues.push(issue);
            target.disable();
        }
        targets.push(target);
    }

    Room {
        name: decl.name.clone(),
        entry_position: vec3(
            decl.entry_position[0],
            decl.entry_position[1],
            decl.entry_position[2],
        ),
        content: decl.content.clone(),
        targets,
    }
}

fn build_target(
    decl: &TargetDecl,
    config: &TourConfig,
    room_names: &HashSet<String>,
    issues: &mut Vec<NavError>,
) -> Target {
    let position = vec3(decl.position[0], decl.position[1], decl.position[2]);
    let explicit_destination = decl
        .destination_position
        .map(|p| vec3(p[0], p[1], p[2]));

    let mut disabled_reason = None;
    let transition = if decl.changes_room {
        match decl.destination_room.as_deref() {
            Some(room) if room_names.contains(room) => {
                let destination = explicit_destination.unwrap_or_else(|| {
                    // Entry position of the destination room, resolved from
                    // the declaration since the graph is still being built
                    config
                        .rooms
                        .iter()
                        .find(|r| r.name == room)
                        .map(|r| vec3(r.entry_position[0], r.entry_position[1], r.entry_position[2]))
                        .unwrap_or(position)
                });
                TransitionSpec::ToRoom {
                    room: room.to_string(),
                    destination,
                }
            }
            Some(room) => {
                disabled_reason =
                    Some(format!("destination room '{}' is not declared", room));
                TransitionSpec::WithinRoom {
                    destination: position,
                }
            }
            None => {
                disabled_reason =
                    Some("changes_room is set but destination_room is missing".to_string());
                TransitionSpec::WithinRoom {
                    destination: position,
                }
            }
        }
    } else {
        TransitionSpec::WithinRoom {
            destination: explicit_destination.unwrap_or(position),
        }
    };

    let mut target = Target::new(decl.name.clone(), position, decl.radius, transition);
    if let Some(label) = &decl.label {
        target = target.with_label(label.clone());
    }

    if let Some(reason) = disabled_reason {
        let issue = NavError::Configuration {
            item: decl.name.clone(),
            reason,
        };
        warn!("Disabling transition: {}", issue);
        issues.push(issue);
        target.disable();
    }

    target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_room_tour() -> TourConfig {
        TourConfig::from_json(
            r#"{
                "start_room": "Gallery",
                "rooms": [
                    {
                        "name": "Gallery",
                        "entry_position": [0.0, 1.6, 4.0],
                        "targets": [
                            { "name": "Entrance", "position": [-1.34, 1.6, 5.23] },
                            {
                                "name": "ToSideWing",
                                "position": [-6.77, 1.6, 3.64],
                                "changes_room": true,
                                "destination_room": "SideWing"
                            }
                        ]
                    },
                    {
                        "name": "SideWing",
                        "entry_position": [0.0, 1.6, -2.0],
                        "targets": [
                            {
                                "name": "BackToGallery",
                                "position": [2.0, 1.6, 0.0],
                                "changes_room": true,
                                "destination_room": "Gallery"
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_within_room_destination_stays_in_current_room() {
        let graph = NavigationGraph::from_config(&two_room_tour()).unwrap();
        let target = graph.room("Gallery").unwrap().targets()[0].clone();

        let destination = graph.resolve_destination("Gallery", &target).unwrap();
        assert!(!destination.changes_room);
        assert_eq!(destination.room, "Gallery");
        assert_eq!(destination.position, vec3(-1.34, 1.6, 5.23));
    }

    #[test]
    fn test_room_change_defaults_to_entry_position() {
        let graph = NavigationGraph::from_config(&two_room_tour()).unwrap();
        let target = graph.room("Gallery").unwrap().targets()[1].clone();

        let destination = graph.resolve_destination("Gallery", &target).unwrap();
        assert!(destination.changes_room);
        assert_eq!(destination.room, "SideWing");
        assert_eq!(destination.position, vec3(0.0, 1.6, -2.0));
    }

    #[test]
    fn test_unknown_destination_room_disables_transition() {
        let config = TourConfig::from_json(
            r#"{
                "start_room": "Gallery",
                "rooms": [
                    {
                        "name": "Gallery",
                        "targets": [
                            {
                                "name": "Broken",
                                "position": [0.0, 1.6, 0.0],
                                "changes_room": true,
                                "destination_room": "Atlantis"
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let graph = NavigationGraph::from_config(&config).unwrap();
        assert_eq!(graph.issues().len(), 1);

        let target = &graph.room("Gallery").unwrap().targets()[0];
        assert!(!target.is_enabled());
    }

    #[test]
    fn test_changes_room_without_destination_disables_transition() {
        let config = TourConfig::from_json(
            r#"{
                "start_room": "Gallery",
                "rooms": [
                    {
                        "name": "Gallery",
                        "targets": [
                            {
                                "name": "Broken",
                                "position": [0.0, 1.6, 0.0],
                                "changes_room": true
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let graph = NavigationGraph::from_config(&config).unwrap();
        assert!(!graph.room("Gallery").unwrap().targets()[0].is_enabled());
        assert!(matches!(
            graph.issues()[0],
            NavError::Configuration { .. }
        ));
    }

    #[test]
    fn test_duplicate_room_name_is_a_hard_error() {
        let config = TourConfig::from_json(
            r#"{
                "start_room": "A",
                "rooms": [
                    { "name": "A", "targets": [{ "name": "t", "position": [0, 0, 0] }] },
                    { "name": "A", "targets": [{ "name": "t", "position": [0, 0, 0] }] }
                ]
            }"#,
        )
        .unwrap();
        assert!(NavigationGraph::from_config(&config).is_err());
    }

    #[test]
    fn test_missing_start_room_is_a_hard_error() {
        let config = TourConfig::from_json(
            r#"{
                "start_room": "Nowhere",
                "rooms": [
                    { "name": "A", "targets": [{ "name": "t", "position": [0, 0, 0] }] }
                ]
            }"#,
        )
        .unwrap();
        assert!(NavigationGraph::from_config(&config).is_err());
    }

    #[test]
    fn test_empty_room_is_logged_not_fatal() {
        let config = TourConfig::from_json(
            r#"{
                "start_room": "A",
                "rooms": [
                    { "name": "A", "targets": [{ "name": "t", "position": [0, 0, 0] }] },
                    { "name": "Empty" }
                ]
            }"#,
        )
        .unwrap();

        let graph = NavigationGraph::from_config(&config).unwrap();
        assert!(graph.contains("Empty"));
        assert_eq!(graph.issues().len(), 1);
    }
}
