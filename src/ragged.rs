use std::cmp::Ordering;

use accurate::{sum::Klein, traits::*};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{JetsubError, JetsubResult};

/// A ragged (jagged) array: flat leaf storage plus one offsets vector per list level.
///
/// A [`Ragged`] of depth 1 is a list of events, each holding a variable number of items. A
/// [`Ragged`] of depth 2 adds one more level, such as events of jets of constituents. Depth 0 is
/// a plain flat array.
///
/// The offsets at level $`k`$ (counting from the outermost level, starting at zero) index into
/// the lists of level $`k + 1`$, and the innermost offsets index directly into the leaves. Every
/// offsets vector starts at zero, never decreases, and ends at the length of the level it
/// indexes. All operations produce a new array and leave their inputs untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct Ragged<T> {
    content: Vec<T>,
    offsets: Vec<Vec<usize>>,
}

impl<T> Ragged<T> {
    /// Create a flat (depth 0) array from a list of leaves.
    pub fn flat(content: Vec<T>) -> Self {
        Self {
            content,
            offsets: Vec::new(),
        }
    }

    /// Create a depth 1 array from a list of lists (for instance, events of particles).
    pub fn from_lists(lists: Vec<Vec<T>>) -> Self {
        let mut offsets = Vec::with_capacity(lists.len() + 1);
        offsets.push(0);
        let mut content = Vec::with_capacity(lists.iter().map(Vec::len).sum());
        for list in lists {
            content.extend(list);
            offsets.push(content.len());
        }
        Self {
            content,
            offsets: vec![offsets],
        }
    }

    /// Create a depth 2 array from a list of lists of lists (for instance, events of jets of
    /// constituents).
    pub fn from_nested(events: Vec<Vec<Vec<T>>>) -> Self {
        let mut outer = Vec::with_capacity(events.len() + 1);
        outer.push(0);
        let mut inner = vec![0];
        let mut content = Vec::new();
        for event in events {
            for list in event {
                content.extend(list);
                inner.push(content.len());
            }
            outer.push(inner.len() - 1);
        }
        Self {
            content,
            offsets: vec![outer, inner],
        }
    }

    /// Create an array from raw leaves and per-level offsets (outermost first).
    ///
    /// # Errors
    ///
    /// Returns [`JetsubError::InvalidOffsets`] if any level is empty, does not start at zero,
    /// decreases, or does not end at the length of the level it indexes.
    pub fn try_new(content: Vec<T>, offsets: Vec<Vec<usize>>) -> JetsubResult<Self> {
        for (level, level_offsets) in offsets.iter().enumerate() {
            let (Some(&first), Some(&last)) = (level_offsets.first(), level_offsets.last()) else {
                return Err(JetsubError::InvalidOffsets(format!(
                    "level {} has no offsets",
                    level + 1
                )));
            };
            if first != 0 {
                return Err(JetsubError::InvalidOffsets(format!(
                    "level {} starts at {} instead of 0",
                    level + 1,
                    first
                )));
            }
            if level_offsets.windows(2).any(|pair| pair[0] > pair[1]) {
                return Err(JetsubError::InvalidOffsets(format!(
                    "level {} is not monotonically non-decreasing",
                    level + 1
                )));
            }
            let expected = offsets
                .get(level + 1)
                .map_or(content.len(), |next| next.len().saturating_sub(1));
            if last != expected {
                return Err(JetsubError::InvalidOffsets(format!(
                    "level {} ends at {} but the level below holds {} entries",
                    level + 1,
                    last,
                    expected
                )));
            }
        }
        Ok(Self { content, offsets })
    }

    /// Reuse this array's shape for a new set of leaves of the same length.
    pub(crate) fn with_content<U>(&self, content: Vec<U>) -> Ragged<U> {
        debug_assert_eq!(content.len(), self.content.len());
        Ragged {
            content,
            offsets: self.offsets.clone(),
        }
    }

    /// Rebuild the innermost lists, letting `fill` push any number of new leaves per list.
    fn rebuild_lists<U, F>(&self, mut fill: F) -> Ragged<U>
    where
        F: FnMut(&[T], &mut Vec<U>),
    {
        let mut content = Vec::with_capacity(self.content.len());
        let mut inner = Vec::with_capacity(self.n_lists() + 1);
        inner.push(0);
        for list in self.lists() {
            fill(list, &mut content);
            inner.push(content.len());
        }
        let mut offsets = self.offsets.clone();
        if let Some(last) = offsets.last_mut() {
            *last = inner;
        }
        Ragged { content, offsets }
    }

    /// The number of list levels above the leaves.
    pub fn depth(&self) -> usize {
        self.offsets.len()
    }

    /// The number of outermost entries (events for a depth 1 or depth 2 array, leaves for a flat
    /// array).
    pub fn len(&self) -> usize {
        self.offsets
            .first()
            .map_or(self.content.len(), |outer| outer.len() - 1)
    }

    /// Returns `true` if there are no outermost entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The total number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.content.len()
    }

    /// The number of innermost lists (zero for a flat array).
    pub fn n_lists(&self) -> usize {
        self.offsets.last().map_or(0, |inner| inner.len() - 1)
    }

    /// The leaves in storage order.
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Consume the array, keeping only its leaves in storage order.
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// The offsets of every list level, outermost first.
    pub fn offsets(&self) -> &[Vec<usize>] {
        &self.offsets
    }

    /// Iterate over the leaves in storage order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.content.iter()
    }

    /// The innermost list at the given flat index.
    pub fn list(&self, index: usize) -> Option<&[T]> {
        let inner = self.offsets.last()?;
        let (start, end) = (*inner.get(index)?, *inner.get(index + 1)?);
        Some(&self.content[start..end])
    }

    /// Iterate over the innermost lists in storage order.
    pub fn lists(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.offsets
            .last()
            .into_iter()
            .flat_map(|inner| inner.windows(2))
            .map(|bounds| &self.content[bounds[0]..bounds[1]])
    }

    /// A short human-readable description of the shape, used in error messages.
    pub fn describe_shape(&self) -> String {
        format!(
            "depth {} with {} entries and {} leaves",
            self.depth(),
            self.len(),
            self.n_leaves()
        )
    }

    /// Returns `true` if both arrays have the same depth and per-level lengths.
    pub fn same_shape<U>(&self, other: &Ragged<U>) -> bool {
        self.offsets == other.offsets && self.content.len() == other.content.len()
    }

    /// Fail with [`JetsubError::ShapeMismatch`] unless both arrays share a shape.
    pub fn check_same_shape<U>(&self, other: &Ragged<U>, context: &str) -> JetsubResult<()> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(JetsubError::ShapeMismatch {
                context: context.to_string(),
                left: self.describe_shape(),
                right: other.describe_shape(),
            })
        }
    }

    /// Fail with [`JetsubError::ShapeMismatch`] unless `inner` has exactly one more level than
    /// this array, with one innermost list per leaf of this array (as constituents relate to
    /// jets).
    pub fn check_parent_of<U>(&self, inner: &Ragged<U>, context: &str) -> JetsubResult<()> {
        let aligned = inner.depth() == self.depth() + 1
            && inner.offsets[..self.depth()] == self.offsets[..]
            && inner.n_lists() == self.n_leaves();
        if aligned {
            Ok(())
        } else {
            Err(JetsubError::ShapeMismatch {
                context: context.to_string(),
                left: self.describe_shape(),
                right: inner.describe_shape(),
            })
        }
    }

    /// Apply `f` to every leaf, keeping the shape.
    #[cfg(feature = "rayon")]
    pub fn map<U, F>(&self, f: F) -> Ragged<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        self.with_content(self.content.par_iter().map(f).collect())
    }

    /// Apply `f` to every leaf, keeping the shape.
    #[cfg(not(feature = "rayon"))]
    pub fn map<U, F>(&self, f: F) -> Ragged<U>
    where
        F: Fn(&T) -> U,
    {
        self.with_content(self.content.iter().map(f).collect())
    }

    /// Combine two arrays of identical shape leaf by leaf.
    ///
    /// # Errors
    ///
    /// Returns [`JetsubError::ShapeMismatch`] if the shapes differ. No broadcasting is attempted.
    #[cfg(feature = "rayon")]
    pub fn zip_with<U, V, F>(&self, other: &Ragged<U>, f: F) -> JetsubResult<Ragged<V>>
    where
        T: Sync,
        U: Sync,
        V: Send,
        F: Fn(&T, &U) -> V + Sync + Send,
    {
        self.check_same_shape(other, "zip_with")?;
        Ok(self.with_content(
            self.content
                .par_iter()
                .zip(other.content.par_iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        ))
    }

    /// Combine two arrays of identical shape leaf by leaf.
    ///
    /// # Errors
    ///
    /// Returns [`JetsubError::ShapeMismatch`] if the shapes differ. No broadcasting is attempted.
    #[cfg(not(feature = "rayon"))]
    pub fn zip_with<U, V, F>(&self, other: &Ragged<U>, f: F) -> JetsubResult<Ragged<V>>
    where
        F: Fn(&T, &U) -> V,
    {
        self.check_same_shape(other, "zip_with")?;
        Ok(self.with_content(
            self.content
                .iter()
                .zip(other.content.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        ))
    }

    /// Pair up the leaves of two arrays of identical shape.
    pub fn zip<U: Clone>(&self, other: &Ragged<U>) -> JetsubResult<Ragged<(T, U)>>
    where
        T: Clone,
    {
        self.check_same_shape(other, "zip")?;
        Ok(self.with_content(
            self.content
                .iter()
                .cloned()
                .zip(other.content.iter().cloned())
                .collect(),
        ))
    }

    /// Keep only the leaves which satisfy `predicate`.
    ///
    /// Every list survives (possibly empty), so the number of events and, for nested arrays,
    /// the number of jets per event are unchanged.
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        T: Clone,
        F: Fn(&T) -> bool,
    {
        if self.depth() == 0 {
            return Self::flat(self.content.iter().filter(|&x| predicate(x)).cloned().collect());
        }
        self.rebuild_lists(|list, content| {
            content.extend(list.iter().filter(|&x| predicate(x)).cloned())
        })
    }

    /// Remove the innermost list level, concatenating the innermost lists of each parent in
    /// order. A depth 1 array becomes a flat array.
    ///
    /// # Errors
    ///
    /// Returns [`JetsubError::LevelMismatch`] for a flat array, which has no level to remove.
    pub fn flatten_one_level(&self) -> JetsubResult<Self>
    where
        T: Clone,
    {
        let depth = self.depth();
        match depth {
            0 => Err(JetsubError::LevelMismatch { level: 1, depth }),
            1 => Ok(Self::flat(self.content.clone())),
            _ => {
                let inner = &self.offsets[depth - 1];
                let parent = &self.offsets[depth - 2];
                let composed = parent.iter().map(|&o| inner[o]).collect();
                let mut offsets = self.offsets[..depth - 2].to_vec();
                offsets.push(composed);
                Ok(Self {
                    content: self.content.clone(),
                    offsets,
                })
            }
        }
    }

    /// All leaves as a flat list, discarding every list boundary.
    pub fn flatten(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.content.clone()
    }

    /// Wrap every leaf in its own one-element list, adding a level.
    ///
    /// This is the explicit form of broadcasting a per-jet quantity down to a per-constituent
    /// level: pairing the singletons of the jets with the constituents at the new level pairs
    /// each jet with each of its own constituents.
    pub fn singletons(&self) -> Self
    where
        T: Clone,
    {
        let mut offsets = self.offsets.clone();
        offsets.push((0..=self.content.len()).collect());
        Self {
            content: self.content.clone(),
            offsets,
        }
    }

    /// Reduce every innermost list to a single value, removing the innermost level.
    ///
    /// # Errors
    ///
    /// Returns [`JetsubError::LevelMismatch`] for a flat array.
    pub fn map_lists<U, F>(&self, f: F) -> JetsubResult<Ragged<U>>
    where
        F: Fn(&[T]) -> U,
    {
        let depth = self.depth();
        if depth == 0 {
            return Err(JetsubError::LevelMismatch { level: 1, depth });
        }
        Ok(Ragged {
            content: self.lists().map(f).collect(),
            offsets: self.offsets[..depth - 1].to_vec(),
        })
    }

    /// The length of every innermost list, removing the innermost level.
    pub fn list_lengths(&self) -> JetsubResult<Ragged<usize>> {
        self.map_lists(<[T]>::len)
    }

    /// Sort the leaves of every innermost list with a stable sort, so equal elements keep their
    /// original order.
    ///
    /// # Errors
    ///
    /// Returns [`JetsubError::LevelMismatch`] for a flat array.
    pub fn sort_lists_by<F>(&self, mut compare: F) -> JetsubResult<Self>
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        if self.depth() == 0 {
            return Err(JetsubError::LevelMismatch { level: 1, depth: 0 });
        }
        Ok(self.rebuild_lists(|list, content| {
            let start = content.len();
            content.extend_from_slice(list);
            content[start..].sort_by(&mut compare);
        }))
    }

    /// A depth 1 array as nested lists.
    ///
    /// # Errors
    ///
    /// Returns [`JetsubError::LevelMismatch`] unless the array has depth 1.
    pub fn to_lists(&self) -> JetsubResult<Vec<Vec<T>>>
    where
        T: Clone,
    {
        if self.depth() != 1 {
            return Err(JetsubError::LevelMismatch {
                level: 1,
                depth: self.depth(),
            });
        }
        Ok(self.lists().map(<[T]>::to_vec).collect())
    }

    /// A depth 2 array as doubly nested lists.
    ///
    /// # Errors
    ///
    /// Returns [`JetsubError::LevelMismatch`] unless the array has depth 2.
    pub fn to_nested(&self) -> JetsubResult<Vec<Vec<Vec<T>>>>
    where
        T: Clone,
    {
        if self.depth() != 2 {
            return Err(JetsubError::LevelMismatch {
                level: 2,
                depth: self.depth(),
            });
        }
        let lists: Vec<Vec<T>> = self.lists().map(<[T]>::to_vec).collect();
        let mut lists = lists.into_iter();
        Ok(self.offsets[0]
            .windows(2)
            .map(|bounds| lists.by_ref().take(bounds[1] - bounds[0]).collect())
            .collect())
    }
}

impl Ragged<f64> {
    /// Sum every innermost list with compensated summation, removing the innermost level.
    ///
    /// Empty lists sum to zero.
    pub fn sum_lists(&self) -> JetsubResult<Ragged<f64>> {
        self.map_lists(|list| list.iter().copied().sum_with_accumulator::<Klein<f64>>())
    }
}

impl<'a, T> IntoIterator for &'a Ragged<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
