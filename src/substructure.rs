use crate::{
    data::FourMomentum,
    kinematics::delta_r,
    pairing::{cartesian, unzip},
    ragged::Ragged,
    JetsubError, JetsubResult,
};

/// The girth (linear radial moment) of every jet,
/// $`g = \sum_i p_{T,i}\,\Delta R(\text{jet}, i) / p_{T,\text{jet}}`$.
///
/// `jets` is a depth 1 array of jets per event and `constituents` the aligned depth 2 array
/// holding one innermost list per jet. The jet axis is broadcast to each of its own constituents
/// by pairing the jets' singletons with the constituents, so every $`\Delta R`$ is measured
/// against the jet the constituent belongs to.
///
/// A jet without constituents has a girth of zero. A jet with zero transverse momentum has a
/// `NaN` girth.
///
/// # Errors
///
/// Returns [`JetsubError::ShapeMismatch`] if the constituents do not hold exactly one list per
/// jet.
pub fn girth<J, C>(jets: &Ragged<J>, constituents: &Ragged<C>) -> JetsubResult<Ragged<f64>>
where
    J: FourMomentum + Clone,
    C: FourMomentum + Clone,
{
    jets.check_parent_of(constituents, "girth")?;
    let (axes, parts) = unzip(&cartesian(&jets.singletons(), constituents, 2)?);
    let weighted = delta_r(&axes, &parts)?.zip_with(&parts.pt(), |dr, pt| pt * dr)?;
    weighted
        .sum_lists()?
        .zip_with(&jets.pt(), |sum, pt| sum / pt)
}

/// The difference between the leading and subleading constituent transverse momenta of every
/// jet, or `None` for jets with fewer than two constituents.
///
/// Constituents are ranked by a stable descending sort on transverse momentum.
///
/// # Errors
///
/// Returns [`JetsubError::LevelMismatch`] unless `constituents` is a depth 2 array (events of
/// jets of constituents).
pub fn lesub<C>(constituents: &Ragged<C>) -> JetsubResult<Ragged<Option<f64>>>
where
    C: FourMomentum,
{
    if constituents.depth() != 2 {
        return Err(JetsubError::LevelMismatch {
            level: 2,
            depth: constituents.depth(),
        });
    }
    let ranked = constituents.pt().sort_lists_by(|a, b| b.total_cmp(a))?;
    ranked.map_lists(|pts| match pts {
        [leading, subleading, ..] => Some(leading - subleading),
        _ => None,
    })
}
