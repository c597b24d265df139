//! Error types for the synthesizer.

use thiserror::Error;

use crate::classify::EdgeClass;

/// Errors that abort synthesis before anything is written.
#[derive(Error, Debug)]
pub enum SynthError {
    /// Parameters failed validation.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A tolerance band is wide enough to reach a neighbouring class.
    #[error("tolerance {tolerance} for {class} is not below half the minimum gap {half_gap} between edge lengths")]
    ToleranceTooWide {
        /// Offending class.
        class: EdgeClass,
        /// Its tolerance.
        tolerance: f64,
        /// Half of the smallest gap between target lengths.
        half_gap: f64,
    },

    /// A vertex pair falls inside two class bands.
    #[error("vertex pair ({a}, {b}) matches both {first} and {second}")]
    AmbiguousEdge {
        /// Lower vertex index.
        a: usize,
        /// Higher vertex index.
        b: usize,
        /// First matching class.
        first: EdgeClass,
        /// Second matching class.
        second: EdgeClass,
    },

    /// An edge names a vertex index outside the vertex list.
    #[error("edge refers to vertex {index}, but only {count} vertices exist")]
    UnknownVertex {
        /// Offending index.
        index: usize,
        /// Number of vertices available.
        count: usize,
    },

    /// Edge endpoints coincide; no orientation frame exists.
    #[error("edge ({a}, {b}) has zero length, cannot orient it")]
    DegenerateEdge {
        /// Lower vertex index.
        a: usize,
        /// Higher vertex index.
        b: usize,
    },

    /// An edge joins vertices of the wrong roles for its class.
    #[error("{class} ({a}, {b}) does not join the expected vertex roles")]
    RoleMismatch {
        /// Edge class.
        class: EdgeClass,
        /// Lower vertex index.
        a: usize,
        /// Higher vertex index.
        b: usize,
    },

    /// Barrel and rod would stop overlapping inside the stroke range.
    #[error("piston on edge ({a}, {b}) is not telescoping over its stroke: overlap {overlap} at full extension, travel {travel} at full retraction")]
    PistonSeparation {
        /// Lower vertex index.
        a: usize,
        /// Higher vertex index.
        b: usize,
        /// Barrel/rod overlap at full extension.
        overlap: f64,
        /// Free barrel length behind the rod at full retraction.
        travel: f64,
    },
}

/// Result type for synthesis operations.
pub type Result<T> = std::result::Result<T, SynthError>;
