//! # Map Error Types
//!
//! Failures are recovered where the user triggered them and turned into a
//! [`crate::Notice`]. None of them ends the session.

use thiserror::Error;
use tilemark_tags::TagError;

/// Errors reported by the external storage layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is closed or not reachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Stored bytes could not be decoded.
    #[error("corrupt data: {0}")]
    Corrupt(String),

    /// Read or write failed.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Invalid input in the create-marker form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerFieldError {
    /// Name left empty.
    #[error("invalid name: name is empty")]
    EmptyName,

    /// Name contains a double quote.
    #[error("invalid name: name contains '\"'")]
    QuoteInName,

    /// Icon left empty.
    #[error("invalid icon: icon is empty")]
    EmptyIcon,

    /// Icon contains a double quote.
    #[error("invalid icon: icon contains '\"'")]
    QuoteInIcon,

    /// A coordinate is not an integer.
    #[error("invalid {axis}: {input:?} is not a whole number")]
    InvalidCoordinate {
        /// `x`, `y` or `z`.
        axis: char,
        /// What was typed.
        input: String,
    },
}

/// Errors while loading the map configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for [`crate::MapConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors surfaced by map operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Tag tree does not have the expected shape.
    #[error("validation failed: {0}")]
    Validation(#[from] TagError),

    /// Saving changes failed.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StorageError),

    /// Requested data does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Loading some world data failed.
    #[error("failed to load {what}: {source}")]
    LoadFailed {
        /// What was being loaded.
        what: String,
        /// Storage failure.
        source: StorageError,
    },

    /// Player data could not be listed or read.
    #[error("failed to retrieve player data: {0}")]
    PlayerData(StorageError),

    /// The world has no multiplayer data.
    #[error("no multiplayer data found")]
    NoMultiplayerData,

    /// Create-marker form rejected.
    #[error(transparent)]
    MarkerFields(#[from] MarkerFieldError),

    /// Only custom markers can be removed.
    #[error("marker is not removable")]
    NotRemovable,
}

impl MapError {
    /// Short message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => "Failed to find or edit local player data".to_string(),
            Self::Persistence(_) => "Failed saving changes".to_string(),
            Self::NotFound(what) => format!("Could not find {what}"),
            Self::LoadFailed { what, .. } => format!("Failed to load {what}"),
            Self::PlayerData(_) => "Failed to retrieve player data".to_string(),
            Self::NoMultiplayerData => "No multiplayer data found".to_string(),
            Self::MarkerFields(field) => capitalize(&field.to_string()),
            Self::NotRemovable => "This marker cannot be removed".to_string(),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Result type for map operations.
pub type MapResult<T> = Result<T, MapError>;

/// Result type for storage calls.
pub type StorageResult<T> = Result<T, StorageError>;
