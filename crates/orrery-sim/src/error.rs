//! Errors raised while building a solar system from its catalog.

use std::path::PathBuf;

use orrery_orbits::OrbitError;

/// Invalid static configuration. Raised at setup, never during a tick.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// A body's orbit parameters were rejected.
    #[error("body `{body}` has an invalid orbit: {source}")]
    InvalidOrbit {
        body: String,
        #[source]
        source: OrbitError,
    },

    /// Display radius must be positive and finite.
    #[error("body `{body}` has invalid radius {radius}")]
    InvalidRadius { body: String, radius: f64 },

    /// Spin rate must be finite.
    #[error("body `{body}` has non-finite rotation speed {speed}")]
    InvalidRotationSpeed { body: String, speed: f64 },

    /// Body names must be non-empty.
    #[error("catalog entry {index} has an empty name")]
    EmptyName { index: usize },

    /// Two bodies share a name (compared case-insensitively).
    #[error("duplicate body name `{0}`")]
    DuplicateBody(String),

    /// A body names a parent that is not in the catalog.
    #[error("body `{body}` orbits unknown parent `{parent}`")]
    UnknownParent { body: String, parent: String },

    /// Following parent links from this body never reaches a root.
    #[error("body `{0}` is part of a parent cycle")]
    ParentCycle(String),

    /// Asteroid belt bounds are unusable.
    #[error("invalid asteroid belt: {0}")]
    InvalidBelt(String),

    /// The catalog file could not be read.
    #[error("cannot read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid RON.
    #[error("malformed catalog: {0}")]
    CatalogParse(#[from] ron::error::SpannedError),
}
