use log::debug;

use crate::{
    data::{Flavor, FourMomentum, Particle, MUON_MASS},
    pairing::cartesian,
    ragged::Ragged,
    selection::{FinalState, Selection, Species},
    JetsubResult,
};

/// The angular distance $`\Delta R = \sqrt{\Delta\phi^2 + \Delta\eta^2}`$ between the items of
/// two arrays of identical shape.
///
/// The azimuthal difference is a plain subtraction and is not wrapped into $`(-\pi, \pi]`$, so
/// two items on either side of $`\phi = \pm\pi`$ are reported as far apart. Items with zero
/// transverse momentum have an infinite or undefined pseudorapidity, which propagates into the
/// result.
///
/// # Errors
///
/// Returns [`JetsubError::ShapeMismatch`](crate::JetsubError::ShapeMismatch) if the shapes
/// differ. To compare a per-jet axis with each of its constituents, broadcast the jets first
/// with [`cartesian`] and [`unzip`](crate::pairing::unzip).
pub fn delta_r<A, B>(v1: &Ragged<A>, v2: &Ragged<B>) -> JetsubResult<Ragged<f64>>
where
    A: FourMomentum,
    B: FourMomentum,
{
    v1.zip_with(v2, |a, b| {
        let (a, b) = (a.p4(), b.p4());
        let dphi = a.phi() - b.phi();
        let deta = a.eta() - b.eta();
        (dphi.powi(2) + deta.powi(2)).sqrt()
    })
}

/// The invariant mass of every pair under explicit mass hypotheses.
///
/// Each side is put on shell with its hypothesis, $`E = \sqrt{|\vec{p}|^2 + m^2}`$, whatever
/// energy it carried, and the mass of the summed four-momentum is returned. The masses are not
/// validated, and a negative mass squared of the sum gives `NaN`.
pub fn invariant_mass<L, R>(
    pairs: &Ragged<(L, R)>,
    left_mass: f64,
    right_mass: f64,
) -> Ragged<f64>
where
    L: FourMomentum,
    R: FourMomentum,
{
    pairs.map(|(l, r)| (l.p4().on_shell(left_mass) + r.p4().on_shell(right_mass)).m())
}

/// The invariant mass of the sum of two arrays of four-momenta of identical shape, using the
/// energies the items carry.
///
/// # Errors
///
/// Returns [`JetsubError::ShapeMismatch`](crate::JetsubError::ShapeMismatch) if the shapes
/// differ.
pub fn pair_mass<L, R>(left: &Ragged<L>, right: &Ragged<R>) -> JetsubResult<Ragged<f64>>
where
    L: FourMomentum,
    R: FourMomentum,
{
    Ok(left.add(right)?.mass())
}

/// Keep only the pairs whose members are each other's antiparticle (`left.pdg == -right.pdg`).
///
/// Every list survives, possibly empty.
pub fn opposite_sign_filter<L, R>(pairs: &Ragged<(L, R)>) -> Ragged<(L, R)>
where
    L: Flavor + Clone,
    R: Flavor + Clone,
{
    pairs.filter(|(l, r)| l.pdg() == -r.pdg())
}

/// The invariant mass of every final-state $`\mu^-\mu^+`$ pair in every event, as a single
/// flat list in event order.
///
/// Each final-state muon (PDG code 13) is paired with each final-state antimuon (PDG code -13)
/// of the same event and both are put on shell with [`MUON_MASS`].
///
/// # Errors
///
/// Returns [`JetsubError::LevelMismatch`](crate::JetsubError::LevelMismatch) unless the
/// particles are a depth 1 array of events.
pub fn dimuon_invariant_mass(particles: &Ragged<Particle>) -> JetsubResult<Vec<f64>> {
    let final_state = Selection::new(FinalState);
    let muons = (Selection::new(Species(13)) & &final_state).apply(particles);
    let antimuons = (Selection::new(Species(-13)) & &final_state).apply(particles);
    debug!(
        "Selected {} muons and {} antimuons in {} events",
        muons.n_leaves(),
        antimuons.n_leaves(),
        particles.len()
    );
    let pairs = cartesian(&muons, &antimuons, 1)?;
    let masses = invariant_mass(&pairs, MUON_MASS, MUON_MASS)
        .flatten_one_level()?
        .into_content();
    debug!("Formed {} dimuon pairs", masses.len());
    Ok(masses)
}
