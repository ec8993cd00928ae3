use std::{fmt::Display, iter::Sum};

use auto_ops::impl_op_ex;
use serde::{Deserialize, Serialize};

/// A three-momentum.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// The $`x`$-component.
    pub x: f64,
    /// The $`y`$-component.
    pub y: f64,
    /// The $`z`$-component.
    pub z: f64,
}

impl Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:6.3}, {:6.3}, {:6.3}]", self.x, self.y, self.z)
    }
}

impl Vec3 {
    /// Create a new [`Vec3`] from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
    /// The $`x`$-component.
    pub fn px(&self) -> f64 {
        self.x
    }
    /// The $`y`$-component.
    pub fn py(&self) -> f64 {
        self.y
    }
    /// The $`z`$-component.
    pub fn pz(&self) -> f64 {
        self.z
    }
    /// Build the on-shell [`Vec4`] of a particle with this three-momentum and the given mass.
    ///
    /// The energy is $`\sqrt{|\vec{p}|^2 + m^2}`$, whatever energy the particle may have carried
    /// before.
    pub fn with_mass(&self, mass: f64) -> Vec4 {
        let e = (self.mag2() + mass.powi(2)).sqrt();
        Vec4::new(self.x, self.y, self.z, e)
    }
    /// Build a [`Vec4`] with this three-momentum and the given energy.
    pub fn with_energy(&self, energy: f64) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, energy)
    }
    /// The dot product with another [`Vec3`].
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
    /// The squared magnitude.
    pub fn mag2(&self) -> f64 {
        self.dot(self)
    }
    /// The squared transverse component, $`x^2 + y^2`$.
    pub fn pt2(&self) -> f64 {
        self.x.powi(2) + self.y.powi(2)
    }
    /// The transverse component, $`\sqrt{x^2 + y^2}`$.
    pub fn pt(&self) -> f64 {
        self.pt2().sqrt()
    }
    /// The azimuthal angle, `atan2(y, x)`, in $`(-\pi, \pi]`$.
    pub fn phi(&self) -> f64 {
        self.y.atan2(self.x)
    }
    /// The pseudorapidity, $`\sinh^{-1}(z / p_T)`$.
    ///
    /// This is $`\pm\infty`$ along the beam axis and `NaN` for the zero vector.
    pub fn eta(&self) -> f64 {
        (self.z / self.pt()).asinh()
    }
}

impl_op_ex!(+ |a: &Vec3, b: &Vec3| -> Vec3 { Vec3::new(a.x + b.x, a.y + b.y, a.z + b.z) });
impl_op_ex!(-|a: &Vec3, b: &Vec3| -> Vec3 { Vec3::new(a.x - b.x, a.y - b.y, a.z - b.z) });
impl_op_ex!(-|a: &Vec3| -> Vec3 { Vec3::new(-a.x, -a.y, -a.z) });

/// A four-momentum with components $`(p_x, p_y, p_z, E)`$.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    /// The $`p_x`$-component.
    pub x: f64,
    /// The $`p_y`$-component.
    pub y: f64,
    /// The $`p_z`$-component.
    pub z: f64,
    /// The energy.
    pub t: f64,
}

impl Display for Vec4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:6.3}, {:6.3}, {:6.3}; {:6.3}]",
            self.x, self.y, self.z, self.t
        )
    }
}

impl Vec4 {
    /// Create a new [`Vec4`] from $`(p_x, p_y, p_z, E)`$.
    pub const fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self {
            x: px,
            y: py,
            z: pz,
            t: e,
        }
    }
    /// The $`p_x`$-component.
    pub fn px(&self) -> f64 {
        self.x
    }
    /// The $`p_y`$-component.
    pub fn py(&self) -> f64 {
        self.y
    }
    /// The $`p_z`$-component.
    pub fn pz(&self) -> f64 {
        self.z
    }
    /// The energy.
    pub fn e(&self) -> f64 {
        self.t
    }
    /// The three-momentum.
    pub fn vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
    /// The Minkowski square, $`E^2 - |\vec{p}|^2`$.
    pub fn m2(&self) -> f64 {
        self.t.powi(2) - self.vec3().mag2()
    }
    /// The invariant mass, $`\sqrt{E^2 - |\vec{p}|^2}`$.
    ///
    /// Off-shell or numerically noisy inputs with a negative radicand give `NaN`.
    pub fn m(&self) -> f64 {
        self.m2().sqrt()
    }
    /// The transverse momentum.
    pub fn pt(&self) -> f64 {
        self.vec3().pt()
    }
    /// The pseudorapidity (see [`Vec3::eta`]).
    pub fn eta(&self) -> f64 {
        self.vec3().eta()
    }
    /// The azimuthal angle in $`(-\pi, \pi]`$.
    pub fn phi(&self) -> f64 {
        self.vec3().phi()
    }
    /// Rebuild this four-momentum on shell with the given mass, keeping its three-momentum.
    pub fn on_shell(&self, mass: f64) -> Self {
        self.vec3().with_mass(mass)
    }
    /// A compact string form, `[px, py, pz; E]`.
    pub fn to_p4_string(&self) -> String {
        format!("{}", self)
    }
}

impl_op_ex!(+ |a: &Vec4, b: &Vec4| -> Vec4 {
    Vec4::new(a.x + b.x, a.y + b.y, a.z + b.z, a.t + b.t)
});
impl_op_ex!(-|a: &Vec4, b: &Vec4| -> Vec4 {
    Vec4::new(a.x - b.x, a.y - b.y, a.z - b.z, a.t - b.t)
});
impl_op_ex!(-|a: &Vec4| -> Vec4 { Vec4::new(-a.x, -a.y, -a.z, -a.t) });

impl Sum for Vec4 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Vec4::default(), |acc, p4| acc + p4)
    }
}

impl<'a> Sum<&'a Vec4> for Vec4 {
    fn sum<I: Iterator<Item = &'a Vec4>>(iter: I) -> Self {
        iter.fold(Vec4::default(), |acc, p4| acc + p4)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_vec_sums() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        let p = Vec4::new(1.0, 2.0, 3.0, 10.0);
        let q = Vec4::new(-1.0, 0.5, 2.0, 4.0);
        assert_eq!(p + q, Vec4::new(0.0, 2.5, 5.0, 14.0));
        assert_eq!([p, q].iter().sum::<Vec4>(), p + q);
    }

    #[test]
    fn test_three_to_four_momentum_conversion() {
        let p3 = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec4::new(1.0, 2.0, 3.0, 10.0);
        let from_mass = p3.with_mass(target.m());
        let from_energy = p3.with_energy(target.e());
        assert_relative_eq!(from_mass.e(), target.e());
        assert_eq!(from_mass.vec3(), target.vec3());
        assert_eq!(from_energy, target);
    }

    #[test]
    fn test_four_momentum_basics() {
        let p = Vec4::new(3.0, 4.0, 5.0, 10.0);
        assert_eq!(p.px(), 3.0);
        assert_eq!(p.py(), 4.0);
        assert_eq!(p.pz(), 5.0);
        assert_eq!(p.e(), 10.0);
        assert_relative_eq!(p.m2(), 50.0);
        assert_relative_eq!(p.m(), 50.0_f64.sqrt());
        assert_relative_eq!(p.pt(), 5.0);
        assert_relative_eq!(p.phi(), 4.0_f64.atan2(3.0));
        assert_relative_eq!(p.eta(), 1.0_f64.asinh());
    }

    #[test]
    fn test_tachyonic_mass_is_nan() {
        let p = Vec4::new(3.0, 4.0, 0.0, 1.0);
        assert!(p.m().is_nan());
    }

    #[test]
    fn test_eta_along_beam_axis() {
        assert_eq!(Vec3::new(0.0, 0.0, 2.0).eta(), f64::INFINITY);
        assert_eq!(Vec3::new(0.0, 0.0, -2.0).eta(), f64::NEG_INFINITY);
        assert!(Vec3::new(0.0, 0.0, 0.0).eta().is_nan());
    }

    #[test]
    fn test_phi_range() {
        assert_relative_eq!(Vec3::new(-1.0, 0.0, 0.0).phi(), PI);
        assert_relative_eq!(Vec3::new(0.0, -1.0, 0.0).phi(), -PI / 2.0);
    }
}
