//! Error types for the experience core.
//!
//! Only setup operations are fallible. The per-frame paths skip anything they
//! cannot resolve instead of returning an error.

use std::fmt;

use crate::experience::registry::VisualId;

/// Main error type of the crate.
#[derive(Debug)]
pub enum ExperienceError {
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// A configuration document could not be parsed.
    ConfigParse(serde_json::Error),
    /// A convex body was registered without any vertex.
    EmptyGeometry(VisualId),
    /// A bounding box is inverted or not finite.
    DegenerateBounds(VisualId),
    /// A starter body is already registered.
    StarterAlreadyRegistered,
    /// The message anchors were already generated.
    MessageAlreadySet,
    /// No registered body is paired with this visual object.
    UnknownVisual(VisualId),
}

impl fmt::Display for ExperienceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "Invalid config: {msg}"),
            Self::ConfigParse(err) => write!(f, "Config parse error: {err}"),
            Self::EmptyGeometry(id) => write!(f, "Convex geometry of {id} has no vertex"),
            Self::DegenerateBounds(id) => write!(f, "Bounding box of {id} is degenerate"),
            Self::StarterAlreadyRegistered => write!(f, "A starter body is already registered"),
            Self::MessageAlreadySet => write!(f, "The message text was already set"),
            Self::UnknownVisual(id) => write!(f, "No body is paired with {id}"),
        }
    }
}

impl std::error::Error for ExperienceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigParse(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenient Result type alias for fallible setup operations.
pub type Result<T> = std::result::Result<T, ExperienceError>;

impl From<serde_json::Error> for ExperienceError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse(err)
    }
}
