use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    ragged::Ragged,
    utils::vectors::{Vec3, Vec4},
    JetsubResult,
};

/// The muon mass in GeV.
pub const MUON_MASS: f64 = 0.1056583755;

/// Anything which carries a four-momentum.
///
/// Every kinematic quantity over a [`Ragged`] array of such items is available through the
/// inherent methods on `Ragged<T: FourMomentum>` ([`Ragged::pt`], [`Ragged::eta`], and so on).
pub trait FourMomentum: Send + Sync {
    /// The four-momentum of this item.
    fn p4(&self) -> Vec4;
}

/// Anything which carries a PDG species code.
pub trait Flavor {
    /// The signed PDG code. The sign separates particles from antiparticles.
    fn pdg(&self) -> i32;
}

impl FourMomentum for Vec4 {
    fn p4(&self) -> Vec4 {
        *self
    }
}

/// A particle record as consumed by the analysis.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// The four-momentum $`(p_x, p_y, p_z, E)`$.
    pub p4: Vec4,
    /// The signed PDG code.
    pub pdg: i32,
    /// The generator status code.
    pub status: i32,
    /// Whether the particle survives to the final state (was not decayed or absorbed).
    pub is_final: bool,
}

impl Particle {
    /// Create a new [`Particle`] with a generator status of zero.
    pub fn new(p4: Vec4, pdg: i32, is_final: bool) -> Self {
        Self {
            p4,
            pdg,
            status: 0,
            is_final,
        }
    }
    /// Set the generator status code.
    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }
}

impl Display for Particle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Particle(pdg: {}, status: {}, final: {}, p4: {})",
            self.pdg,
            self.status,
            self.is_final,
            self.p4.to_p4_string()
        )
    }
}

impl FourMomentum for Particle {
    fn p4(&self) -> Vec4 {
        self.p4
    }
}

impl Flavor for Particle {
    fn pdg(&self) -> i32 {
        self.pdg
    }
}

/// A reconstructed jet.
///
/// Constituents are not stored inside the jet. They live in a depth 2 [`Ragged`] array aligned
/// with the depth 1 array of jets, one innermost list per jet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Jet {
    /// The four-momentum of the jet axis.
    pub p4: Vec4,
}

impl Jet {
    /// Create a new [`Jet`] from its four-momentum.
    pub fn new(p4: Vec4) -> Self {
        Self { p4 }
    }
    /// Create a [`Jet`] whose four-momentum is the sum of its constituents' (E-scheme
    /// recombination).
    pub fn from_constituents<T: FourMomentum>(constituents: &[T]) -> Self {
        Self::new(constituents.iter().map(FourMomentum::p4).sum())
    }
}

impl Display for Jet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Jet(pt: {:.3}, p4: {})",
            self.p4.pt(),
            self.p4.to_p4_string()
        )
    }
}

impl FourMomentum for Jet {
    fn p4(&self) -> Vec4 {
        self.p4
    }
}

impl<T: FourMomentum> Ragged<T> {
    /// The four-momentum of every item.
    pub fn p4s(&self) -> Ragged<Vec4> {
        self.map(|item| item.p4())
    }
    /// The transverse momentum of every item.
    pub fn pt(&self) -> Ragged<f64> {
        self.map(|item| item.p4().pt())
    }
    /// The pseudorapidity of every item (non-finite for items with zero transverse momentum).
    pub fn eta(&self) -> Ragged<f64> {
        self.map(|item| item.p4().eta())
    }
    /// The azimuthal angle of every item.
    pub fn phi(&self) -> Ragged<f64> {
        self.map(|item| item.p4().phi())
    }
    /// The invariant mass of every item (`NaN` where the mass squared is negative).
    pub fn mass(&self) -> Ragged<f64> {
        self.map(|item| item.p4().m())
    }
    /// The component-wise sum of the four-momenta of two arrays of identical shape.
    ///
    /// # Errors
    ///
    /// Returns [`JetsubError::ShapeMismatch`](crate::JetsubError::ShapeMismatch) if the shapes
    /// differ.
    pub fn add<U: FourMomentum>(&self, other: &Ragged<U>) -> JetsubResult<Ragged<Vec4>> {
        self.zip_with(other, |a, b| a.p4() + b.p4())
    }
}

/// A small batch of events for testing particle-level operations.
///
/// - Event 0: a $`\mu^+\mu^-`$ pair (on shell, back to back) and a $`\pi^+`$.
/// - Event 1: no particles.
/// - Event 2: two final-state $`\mu^-`$, one final-state $`\mu^+`$, and one non-final $`\mu^+`$.
pub fn test_events() -> Ragged<Particle> {
    let muon = |px: f64, py: f64, pz: f64, pdg: i32, is_final: bool| {
        Particle::new(Vec3::new(px, py, pz).with_mass(MUON_MASS), pdg, is_final)
    };
    Ragged::from_lists(vec![
        vec![
            muon(3.0, 0.0, 0.0, 13, true),
            muon(-3.0, 0.0, 0.0, -13, true),
            Particle::new(Vec3::new(0.4, 1.2, -2.0).with_mass(0.13957039), 211, true),
        ],
        vec![],
        vec![
            muon(10.0, 2.0, 5.0, 13, true),
            muon(-4.0, 6.0, 1.0, 13, true),
            muon(-5.0, -7.0, -3.0, -13, true),
            muon(1.0, 1.0, 1.0, -13, false).with_status(-62),
        ],
    ])
}

/// A small batch of clustered events for testing substructure, as `(jets, constituents)`.
///
/// - Event 0: a jet with three constituents of transverse momenta 5, 3 and 1, and a jet with a
///   single constituent.
/// - Event 1: no jets.
/// - Event 2: a jet with no constituents and a jet with two constituents.
pub fn test_jets() -> (Ragged<Jet>, Ragged<Particle>) {
    let pion = |pt: f64, phi: f64, eta: f64| {
        let p3 = Vec3::new(pt * phi.cos(), pt * phi.sin(), pt * eta.sinh());
        Particle::new(p3.with_mass(0.13957039), 211, true)
    };
    let constituents = vec![
        vec![
            vec![
                pion(5.0, 0.1, 0.2),
                pion(3.0, 0.3, 0.0),
                pion(1.0, -0.2, 0.1),
            ],
            vec![pion(12.0, 2.0, -1.0)],
        ],
        vec![],
        vec![vec![], vec![pion(4.0, -1.5, 0.5), pion(4.0, -1.3, 0.7)]],
    ];
    let jets: Vec<Vec<Jet>> = constituents
        .iter()
        .map(|event| {
            event
                .iter()
                .map(|list| {
                    if list.is_empty() {
                        Jet::new(Vec4::new(6.0, 8.0, 0.0, 10.0))
                    } else {
                        Jet::from_constituents(list)
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();
    (Ragged::from_lists(jets), Ragged::from_nested(constituents))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::JetsubError;

    #[test]
    fn test_event_fixture_shape() {
        let events = test_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events.list_lengths().unwrap().content(), &[3, 0, 4]);
        for particle in &events {
            if particle.pdg.abs() == 13 {
                assert_relative_eq!(particle.p4.m(), MUON_MASS, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_jet_fixture_alignment() {
        let (jets, constituents) = test_jets();
        assert!(jets.check_parent_of(&constituents, "fixture").is_ok());
        assert_eq!(
            constituents.list_lengths().unwrap().to_lists().unwrap(),
            vec![vec![3, 1], vec![], vec![0, 2]]
        );
        let pts = constituents.pt();
        assert_relative_eq!(pts.content()[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(pts.content()[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(pts.content()[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ragged_kinematics_keep_shape() {
        let events = test_events();
        for derived in [events.pt(), events.eta(), events.phi(), events.mass()] {
            assert!(derived.same_shape(&events));
        }
        assert_relative_eq!(events.pt().content()[0], 3.0);
        assert_relative_eq!(events.phi().content()[1], std::f64::consts::PI);
        assert_eq!(events.eta().content()[0], 0.0);
    }

    #[test]
    fn test_ragged_add() {
        let a = Ragged::from_lists(vec![vec![Vec4::new(1.0, 2.0, 3.0, 10.0)], vec![]]);
        let b = Ragged::from_lists(vec![vec![Vec4::new(-1.0, 0.0, 1.0, 5.0)], vec![]]);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.content(), &[Vec4::new(0.0, 2.0, 4.0, 15.0)]);
        assert_relative_eq!(sum.mass().content()[0], (225.0_f64 - 20.0).sqrt());
        let c = Ragged::from_lists(vec![vec![], vec![Vec4::default()]]);
        assert!(matches!(a.add(&c), Err(JetsubError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_particle_display() {
        let particle = Particle::new(Vec4::new(1.0, 0.0, 0.0, 2.0), -13, false).with_status(-62);
        assert_eq!(particle.pdg(), -13);
        assert!(particle
            .to_string()
            .starts_with("Particle(pdg: -13, status: -62, final: false"));
    }
}
