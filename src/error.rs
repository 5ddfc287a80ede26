//! Error handling for Hearth Bridge
//!
//! One error type for every fallible bridge operation. Resolution failures
//! (unknown block, item or entity ids) are not errors and come back as `None`.

use std::error::Error as StdError;
use std::fmt;

use crate::world::core::{BlockPos, ChunkPos};

/// Main error type for Hearth Bridge
#[derive(Debug)]
pub enum BridgeError {
    // Conversion Errors
    UnsupportedTagKind {
        kind: String,
    },
    HeterogeneousList {
        expected: String,
        found: String,
    },
    UnsupportedPropertyKind {
        property: String,
        kind: String,
    },
    UnknownProperty {
        block: String,
        property: String,
    },
    InvalidPropertyValue {
        property: String,
        value: String,
    },
    PropertyValueMismatch {
        property: String,
        expected: String,
        found: String,
    },

    // Regeneration Errors
    ChunkGenerationFailed {
        pos: ChunkPos,
        reason: String,
    },
    RegenInProgress {
        world: String,
    },
    RegenFailed {
        pos: Option<BlockPos>,
        reason: String,
    },

    // Host Binding Errors
    HostVersionMismatch {
        expected: Vec<u32>,
        found: u32,
    },
    HostError {
        operation: String,
        error: String,
    },

    // Configuration Errors
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    // System Errors
    IoError {
        path: String,
        error: String,
    },

    // Generic fallback for unexpected errors
    Internal {
        message: String,
    },
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::UnsupportedTagKind { kind } => {
                write!(f, "No conversion known for tag kind {}", kind)
            }
            BridgeError::HeterogeneousList { expected, found } => write!(
                f,
                "List elements must share one kind: expected {}, found {}",
                expected, found
            ),
            BridgeError::UnsupportedPropertyKind { property, kind } => write!(
                f,
                "Hearth Bridge needs an update to support property '{}' of kind {}",
                property, kind
            ),
            BridgeError::UnknownProperty { block, property } => {
                write!(f, "Block {} has no property named '{}'", block, property)
            }
            BridgeError::InvalidPropertyValue { property, value } => {
                write!(f, "Property '{}' does not contain {}", property, value)
            }
            BridgeError::PropertyValueMismatch {
                property,
                expected,
                found,
            } => write!(
                f,
                "Property '{}' expects a {} value, got {}",
                property, expected, found
            ),

            BridgeError::ChunkGenerationFailed { pos, reason } => write!(
                f,
                "Failed to generate chunk ({}, {}), regen failed: {}",
                pos.x, pos.z, reason
            ),
            BridgeError::RegenInProgress { world } => {
                write!(f, "Regeneration world '{}' is still registered", world)
            }
            BridgeError::RegenFailed { pos, reason } => match pos {
                Some(pos) => write!(f, "Regen failed at {}: {}", pos, reason),
                None => write!(f, "Regen failed: {}", reason),
            },

            BridgeError::HostVersionMismatch { expected, found } => write!(
                f,
                "Unsupported host data version {} (supported: {:?})",
                found, expected
            ),
            BridgeError::HostError { operation, error } => {
                write!(f, "Host operation '{}' failed: {}", operation, error)
            }

            BridgeError::InvalidConfig {
                field,
                value,
                reason,
            } => write!(f, "Invalid config: {} = {} ({})", field, value, reason),

            BridgeError::IoError { path, error } => write!(f, "IO error for {}: {}", path, error),

            BridgeError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl StdError for BridgeError {}

/// Type alias for Results in Hearth Bridge
pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    /// Conversion errors abort the current operation and are never partially applied
    pub fn is_conversion(&self) -> bool {
        matches!(
            self,
            BridgeError::UnsupportedTagKind { .. }
                | BridgeError::HeterogeneousList { .. }
                | BridgeError::UnsupportedPropertyKind { .. }
                | BridgeError::UnknownProperty { .. }
                | BridgeError::InvalidPropertyValue { .. }
                | BridgeError::PropertyValueMismatch { .. }
        )
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(error: std::io::Error) -> Self {
        BridgeError::IoError {
            path: String::new(),
            error: error.to_string(),
        }
    }
}

impl From<crate::host::HostError> for BridgeError {
    fn from(err: crate::host::HostError) -> Self {
        use crate::host::HostError;
        match err {
            HostError::ChunkSourceClosed => BridgeError::HostError {
                operation: "chunk_source".to_string(),
                error: err.to_string(),
            },
            HostError::WorldExists(ref name) => BridgeError::RegenInProgress {
                world: name.clone(),
            },
            HostError::WorldCreation(e) => BridgeError::HostError {
                operation: "create_world".to_string(),
                error: e,
            },
            HostError::Io(e) => BridgeError::IoError {
                path: String::new(),
                error: e.to_string(),
            },
        }
    }
}

// Helper functions for common error patterns

/// Convert Option to Result with context
pub trait OptionExt<T> {
    fn ok_or_bridge<F>(self, f: F) -> BridgeResult<T>
    where
        F: FnOnce() -> BridgeError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_bridge<F>(self, f: F) -> BridgeResult<T>
    where
        F: FnOnce() -> BridgeError,
    {
        self.ok_or_else(f)
    }
}

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> BridgeResult<T>;
    fn with_context<F>(self, f: F) -> BridgeResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: fmt::Display,
{
    fn context(self, msg: &str) -> BridgeResult<T> {
        self.map_err(|e| BridgeError::Internal {
            message: format!("{}: {}", msg, e),
        })
    }

    fn with_context<F>(self, f: F) -> BridgeResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| BridgeError::Internal {
            message: format!("{}: {}", f(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BridgeError::UnsupportedTagKind {
            kind: "Opaque(99)".to_string(),
        };
        assert_eq!(err.to_string(), "No conversion known for tag kind Opaque(99)");
    }

    #[test]
    fn test_chunk_failure_display() {
        let err = BridgeError::ChunkGenerationFailed {
            pos: ChunkPos::new(2, -3),
            reason: "noise overflow".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to generate chunk (2, -3), regen failed: noise overflow"
        );
    }

    #[test]
    fn test_conversion_classification() {
        let err = BridgeError::UnknownProperty {
            block: "minecraft:lever".to_string(),
            property: "color".to_string(),
        };
        assert!(err.is_conversion());
        assert!(!BridgeError::Internal {
            message: "x".to_string()
        }
        .is_conversion());
    }

    #[test]
    fn test_option_ext() {
        let opt: Option<i32> = None;
        let result = opt.ok_or_bridge(|| BridgeError::Internal {
            message: "test".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_error_context() {
        let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let with_context = result.context("loading config");
        match with_context {
            Err(BridgeError::Internal { message }) => {
                assert!(message.starts_with("loading config"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
