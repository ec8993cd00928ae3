use std::fmt::{Debug, Display};

use auto_ops::impl_op_ex;
use dyn_clone::DynClone;

use crate::{
    data::{Flavor, FourMomentum, Particle},
    ragged::Ragged,
};

/// A single requirement on a [`Particle`].
///
/// Cuts are combined into a [`Selection`] which can be applied to a whole [`Ragged`] array of
/// particles at once.
pub trait Cut: DynClone + Send + Sync {
    /// Returns `true` if the particle satisfies this cut.
    fn passes(&self, particle: &Particle) -> bool;
    /// A short human-readable label used when printing a [`Selection`].
    fn name(&self) -> String;
}

dyn_clone::clone_trait_object!(Cut);

/// Requires a specific signed PDG code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Species(pub i32);

impl Cut for Species {
    fn passes(&self, particle: &Particle) -> bool {
        particle.pdg() == self.0
    }
    fn name(&self) -> String {
        format!("pdg == {}", self.0)
    }
}

/// Requires a PDG code of the given magnitude, accepting particles and antiparticles alike.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AbsSpecies(pub i32);

impl Cut for AbsSpecies {
    fn passes(&self, particle: &Particle) -> bool {
        particle.pdg().abs() == self.0.abs()
    }
    fn name(&self) -> String {
        format!("|pdg| == {}", self.0.abs())
    }
}

/// Requires a final-state particle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FinalState;

impl Cut for FinalState {
    fn passes(&self, particle: &Particle) -> bool {
        particle.is_final
    }
    fn name(&self) -> String {
        "final state".to_string()
    }
}

/// Requires a transverse momentum strictly above a threshold.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MinPt(pub f64);

impl Cut for MinPt {
    fn passes(&self, particle: &Particle) -> bool {
        particle.p4().pt() > self.0
    }
    fn name(&self) -> String {
        format!("pt > {}", self.0)
    }
}

/// A tree of [`Cut`]s combined with `&`, `|`, and `!`.
#[derive(Clone)]
pub enum Selection {
    /// A single [`Cut`].
    Cut(Box<dyn Cut>),
    /// Both [`Selection`]s must pass.
    And(Box<Selection>, Box<Selection>),
    /// Either [`Selection`] must pass.
    Or(Box<Selection>, Box<Selection>),
    /// The [`Selection`] must fail.
    Not(Box<Selection>),
}

impl Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_tree(f, "", "", "")
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[rustfmt::skip]
impl_op_ex!(& |lhs: &Selection, rhs: &Selection| -> Selection { lhs.and(rhs) });
#[rustfmt::skip]
impl_op_ex!(| |lhs: &Selection, rhs: &Selection| -> Selection { lhs.or(rhs) });
#[rustfmt::skip]
impl_op_ex!(! |selection: &Selection| -> Selection { Selection::Not(Box::new(selection.clone())) });

impl Selection {
    /// Wrap a single [`Cut`].
    pub fn new<C: Cut + 'static>(cut: C) -> Self {
        Self::Cut(Box::new(cut))
    }

    /// Construct a [`Selection::And`] from the current selection and another.
    pub fn and(&self, rhs: &Selection) -> Selection {
        Selection::And(Box::new(self.clone()), Box::new(rhs.clone()))
    }

    /// Construct a [`Selection::Or`] from the current selection and another.
    pub fn or(&self, rhs: &Selection) -> Selection {
        Selection::Or(Box::new(self.clone()), Box::new(rhs.clone()))
    }

    /// Returns `true` if the particle satisfies this selection.
    pub fn passes(&self, particle: &Particle) -> bool {
        match self {
            Self::Cut(cut) => cut.passes(particle),
            Self::And(a, b) => a.passes(particle) && b.passes(particle),
            Self::Or(a, b) => a.passes(particle) || b.passes(particle),
            Self::Not(a) => !a.passes(particle),
        }
    }

    /// Keep the particles which satisfy this selection. Every list of the input survives,
    /// possibly empty.
    pub fn apply(&self, particles: &Ragged<Particle>) -> Ragged<Particle> {
        particles.filter(|particle| self.passes(particle))
    }

    /// Credit to Daniel Janus: <https://blog.danieljanus.pl/2023/07/20/iterating-trees/>
    fn write_tree(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        parent_prefix: &str,
        immediate_prefix: &str,
        parent_suffix: &str,
    ) -> std::fmt::Result {
        let display_string = match self {
            Self::Cut(cut) => cut.name(),
            Self::And(_, _) => "&".to_string(),
            Self::Or(_, _) => "|".to_string(),
            Self::Not(_) => "!".to_string(),
        };
        writeln!(f, "{}{}{}", parent_prefix, immediate_prefix, display_string)?;
        match self {
            Self::Cut(_) => {}
            Self::And(a, b) | Self::Or(a, b) => {
                let terms = [a, b];
                let mut it = terms.iter().peekable();
                let child_prefix = format!("{}{}", parent_prefix, parent_suffix);
                while let Some(child) = it.next() {
                    match it.peek() {
                        Some(_) => child.write_tree(f, &child_prefix, "├─ ", "│  "),
                        None => child.write_tree(f, &child_prefix, "└─ ", "   "),
                    }?;
                }
            }
            Self::Not(a) => {
                let child_prefix = format!("{}{}", parent_prefix, parent_suffix);
                a.write_tree(f, &child_prefix, "└─ ", "   ")?;
            }
        }
        Ok(())
    }
}
