//! Error types for MJCF serialization.

use gyrobot_ir::EntityKind;
use thiserror::Error;

/// Errors from rendering or writing an MJCF document.
#[derive(Error, Debug)]
pub enum MjcfError {
    /// Two entities share a name.
    #[error("name {name:?} used by both a {first} and a {second}")]
    DuplicateName {
        /// The colliding name.
        name: String,
        /// Kind of the first entity with the name.
        first: EntityKind,
        /// Kind of the second entity with the name.
        second: EntityKind,
    },

    /// A reference does not resolve to an entity of the expected kind.
    #[error("{referrer} refers to {kind} {name:?}, which does not exist")]
    UnresolvedReference {
        /// Expected kind.
        kind: EntityKind,
        /// Referenced name.
        name: String,
        /// Name of the referring entity.
        referrer: String,
    },

    /// A geom, site or tendon has a size the engine cannot load.
    #[error("{kind} {name:?} has degenerate size {size}")]
    DegenerateSize {
        /// Kind of the entity.
        kind: EntityKind,
        /// Entity name.
        name: String,
        /// The offending size.
        size: f64,
    },

    /// XML generation failed.
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for MJCF operations.
pub type Result<T> = std::result::Result<T, MjcfError>;
