/// Useful enumerations for jet algorithms.
pub mod enums;
/// Three- and four-vectors with the kinematic quantities used in collider analyses.
pub mod vectors;
