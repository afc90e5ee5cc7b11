//! # User Notices
//!
//! Short messages the session queues for the user, one per outcome.

use std::fmt;

use tilemark_shared::Dimension;

use crate::error::MapError;

/// Message to show the user.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// The local player was moved.
    Teleported {
        /// Stored X.
        x: f64,
        /// Stored Y.
        y: f64,
        /// Stored Z.
        z: f64,
        /// Target dimension.
        dimension: Dimension,
        /// Marker that was teleported to, if any.
        label: Option<String>,
    },
    /// A custom marker was placed.
    MarkerCreated {
        /// Marker name.
        name: String,
        /// Block X.
        x: i32,
        /// Block Y.
        y: i32,
        /// Block Z.
        z: i32,
    },
    /// Multiplayer players listed.
    PlayersFound(Vec<String>),
    /// Teleport did not happen.
    TeleportFailed(MapError),
    /// The local player record is missing or malformed.
    PlayerDataUnavailable(MapError),
    /// Any other failure.
    Failed(MapError),
}

impl Notice {
    /// Returns true for failure notices.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(
            self,
            Self::TeleportFailed(_) | Self::PlayerDataUnavailable(_) | Self::Failed(_)
        )
    }

    /// Underlying error of a failure notice.
    #[must_use]
    pub const fn error(&self) -> Option<&MapError> {
        match self {
            Self::TeleportFailed(err) | Self::PlayerDataUnavailable(err) | Self::Failed(err) => {
                Some(err)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teleported {
                x,
                y,
                z,
                dimension,
                label,
            } => {
                write!(f, "Teleported player to {x};{y};{z} [{dimension}]")?;
                if let Some(label) = label {
                    write!(f, " ({label})")?;
                }
                Ok(())
            }
            Self::MarkerCreated { name, x, y, z } => {
                write!(f, "Created marker \"{name}\" at {x};{y};{z}")
            }
            Self::PlayersFound(names) => write!(f, "Found {} players", names.len()),
            Self::TeleportFailed(_) => f.write_str("Failed teleporting player"),
            Self::PlayerDataUnavailable(_) => {
                f.write_str("Failed to find or edit local player data")
            }
            Self::Failed(err) => f.write_str(&err.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teleport_message() {
        let notice = Notice::Teleported {
            x: 10.0,
            y: 20.0,
            z: 30.0,
            dimension: Dimension::NETHER,
            label: Some("Home".into()),
        };
        assert_eq!(notice.to_string(), "Teleported player to 10;20;30 [Nether] (Home)");
        assert!(!notice.is_error());
    }

    #[test]
    fn test_failure_messages() {
        let notice = Notice::Failed(MapError::NotRemovable);
        assert!(notice.is_error());
        assert_eq!(notice.to_string(), "This marker cannot be removed");

        let notice = Notice::TeleportFailed(MapError::NotFound("local player".into()));
        assert_eq!(notice.to_string(), "Failed teleporting player");
        assert_eq!(notice.error(), Some(&MapError::NotFound("local player".into())));
    }
}
