use log::trace;

use crate::{ragged::Ragged, JetsubError, JetsubResult};

/// Form every ordered pair `(l, r)` within each innermost group of two arrays.
///
/// `level` names the list level whose groups are paired: `1` pairs the items of each event
/// (particle × particle), `2` pairs the items of each jet's list (jet × constituent, with the
/// jets first wrapped by [`Ragged::singletons`]). Both arrays must hold their leaves at `level`
/// and share every outer level, so group `i` of `left` is paired only with group `i` of
/// `right`.
///
/// Within a group the pairs are row-major: every pair for the first element of `left` comes
/// before any pair for the second. A group produces `len(left) * len(right)` pairs, so an empty
/// group on either side produces none. No identity special-casing is done: pairing an array
/// with itself yields self-pairs and both orderings of every distinct pair.
///
/// # Errors
///
/// Returns [`JetsubError::LevelMismatch`] if either array does not hold its leaves at `level`
/// and [`JetsubError::ShapeMismatch`] if the outer levels differ.
pub fn cartesian<L, R>(
    left: &Ragged<L>,
    right: &Ragged<R>,
    level: usize,
) -> JetsubResult<Ragged<(L, R)>>
where
    L: Clone,
    R: Clone,
{
    for depth in [left.depth(), right.depth()] {
        if level == 0 || depth != level {
            return Err(JetsubError::LevelMismatch { level, depth });
        }
    }
    let outer_matches = left.offsets()[..level - 1] == right.offsets()[..level - 1]
        && left.n_lists() == right.n_lists();
    if !outer_matches {
        return Err(JetsubError::ShapeMismatch {
            context: format!("cartesian at level {}", level),
            left: left.describe_shape(),
            right: right.describe_shape(),
        });
    }
    let n_pairs: usize = left
        .lists()
        .zip(right.lists())
        .map(|(l, r)| l.len() * r.len())
        .sum();
    trace!(
        "cartesian at level {}: {} groups, {} pairs",
        level,
        left.n_lists(),
        n_pairs
    );
    let mut content = Vec::with_capacity(n_pairs);
    let mut inner = Vec::with_capacity(left.n_lists() + 1);
    inner.push(0);
    for (l_group, r_group) in left.lists().zip(right.lists()) {
        for l in l_group {
            content.extend(r_group.iter().map(|r| (l.clone(), r.clone())));
        }
        inner.push(content.len());
    }
    let mut offsets = left.offsets()[..level - 1].to_vec();
    offsets.push(inner);
    Ragged::try_new(content, offsets)
}

/// Split an array of pairs into two arrays of the same shape.
///
/// Applied to the output of [`cartesian`], this gives both inputs broadcast to the shape of
/// the product: the left array repeats each element once per partner, and the right array
/// repeats its whole group once per left element.
pub fn unzip<L, R>(pairs: &Ragged<(L, R)>) -> (Ragged<L>, Ragged<R>)
where
    L: Clone,
    R: Clone,
{
    let (lefts, rights) = pairs.iter().cloned().unzip();
    (pairs.with_content(lefts), pairs.with_content(rights))
}
