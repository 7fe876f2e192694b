use std::fmt;

/// Error types for tour navigation.
///
/// Configuration problems are detected at load time where possible and the
/// offending transition is disabled; nothing here ever aborts the tick loop.
#[derive(Debug, Clone, PartialEq)]
pub enum NavError {
    /// Invalid tour declaration (bad JSON, missing rooms, malformed transition)
    Configuration { item: String, reason: String },

    /// A transition references a room the navigation graph does not know
    UnknownRoom { room: String },

    /// A confirmation referenced a target not present in the registry
    UnknownTarget { target: String },

    /// Room content failed to mount
    LoadFailure { room: String, reason: String },

    /// A room switch was requested while another one is still loading
    TransitionInFlight { room: String },
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::Configuration { item, reason } => {
                write!(f, "Configuration error in '{}': {}", item, reason)
            }
            NavError::UnknownRoom { room } => {
                write!(f, "Unknown room '{}'", room)
            }
            NavError::UnknownTarget { target } => {
                write!(f, "Unknown target '{}'", target)
            }
            NavError::LoadFailure { room, reason } => {
                write!(f, "Failed to load room '{}': {}", room, reason)
            }
            NavError::TransitionInFlight { room } => {
                write!(f, "Room switch to '{}' already in flight", room)
            }
        }
    }
}

impl std::error::Error for NavError {}

/// Result type for navigation operations
pub type NavResult<T> = Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = NavError::Configuration {
            item: "exit-hall".to_string(),
            reason: "destination room 'Hall' not found".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("exit-hall"));
        assert!(text.contains("Hall"));
    }
}
