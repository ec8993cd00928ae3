//! # jetsub
//!
//! Ragged-array kinematics and jet substructure for batches of collision events.
//!
//! Events hold a variable number of particles, and after clustering a variable number of jets,
//! each of which holds a variable number of constituents. Every quantity in this crate is computed
//! over a [`Ragged`] array, an explicit offsets-based container whose shape is checked at every
//! operation that combines two arrays.
//!
//! ```
//! use jetsub::{dimuon_invariant_mass, Particle, Ragged, Vec3};
//!
//! let mass = jetsub::MUON_MASS;
//! let events = Ragged::from_lists(vec![vec![
//!     Particle::new(Vec3::new(3.0, 0.0, 0.0).with_mass(mass), 13, true),
//!     Particle::new(Vec3::new(-3.0, 0.0, 0.0).with_mass(mass), -13, true),
//! ]]);
//! let masses = dimuon_invariant_mass(&events).unwrap();
//! assert_eq!(masses.len(), 1);
//! assert!((masses[0] - 2.0 * (9.0 + mass * mass).sqrt()).abs() < 1e-12);
//! ```
#![warn(clippy::perf, clippy::style)]
#![warn(missing_docs)]
#![allow(clippy::excessive_precision)]

use thiserror::Error;

/// Jet definitions and the interface to an external clustering algorithm.
pub mod clustering;
/// Particles, jets, and the four-momentum trait shared by both.
pub mod data;
/// Angular distances, invariant masses, and the dimuon selection.
pub mod kinematics;
/// Cartesian products and their inverse over [`Ragged`] arrays.
pub mod pairing;
/// The offsets-based ragged container.
pub mod ragged;
/// Composable particle selections.
pub mod selection;
/// Jet substructure observables.
pub mod substructure;
/// Utility enums and four-vectors.
pub mod utils;

pub use crate::clustering::{cluster_jets, ClusteredEvents, ClusteringOracle, JetDefinition};
pub use crate::data::{Flavor, FourMomentum, Jet, Particle, MUON_MASS};
pub use crate::kinematics::{
    delta_r, dimuon_invariant_mass, invariant_mass, opposite_sign_filter, pair_mass,
};
pub use crate::pairing::{cartesian, unzip};
pub use crate::ragged::Ragged;
pub use crate::selection::{AbsSpecies, Cut, FinalState, MinPt, Selection, Species};
pub use crate::substructure::{girth, lesub};
pub use crate::utils::enums::JetAlgorithm;
pub use crate::utils::vectors::{Vec3, Vec4};

/// The result type used throughout `jetsub`.
pub type JetsubResult<T> = Result<T, JetsubError>;

/// The error type used by all `jetsub` methods
///
/// Only structural problems are reported as errors. Numerical degeneracies (negative mass
/// squared, division by zero transverse momentum) are carried as non-finite values and
/// degenerate cardinalities as `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JetsubError {
    /// Two arrays which must share a ragged shape do not.
    #[error("Shape mismatch in {context}: {left} vs {right}")]
    ShapeMismatch {
        /// The operation which required matching shapes
        context: String,
        /// A description of the left-hand shape
        left: String,
        /// A description of the right-hand shape
        right: String,
    },
    /// A nesting level was requested which does not hold the leaves of an array.
    #[error("Level {level} is not the leaf level of an array of depth {depth}")]
    LevelMismatch {
        /// The requested level
        level: usize,
        /// The depth of the array
        depth: usize,
    },
    /// Offsets given to a [`Ragged`] constructor do not describe a valid layout.
    #[error("Invalid offsets: {0}")]
    InvalidOffsets(String),
    /// An error which occurs when the user tries to parse an invalid string of text, typically
    /// into an enum variant.
    #[error("Failed to parse string: \"{name}\" does not correspond to a valid \"{object}\"!")]
    ParseError {
        /// The string which was parsed
        name: String,
        /// The name of the object it failed to parse into
        object: String,
    },
    /// A [`ClusteringOracle`] failed to cluster an event batch.
    #[error("Clustering failed: {0}")]
    Clustering(String),
    /// A custom fallback error for errors too complex or too infrequent to warrant their own error
    /// category.
    #[error("{0}")]
    Custom(String),
}
