use std::fmt;

/// Cartesian vector in nanometers (positions), nm/ps (velocities) or
/// kJ/mol/nm (forces).
pub type Vec3 = [f64; 3];

/// The three Cartesian axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Ordinal of the periodic box vector that must lie along this axis.
    pub const fn ordinal(self) -> &'static str {
        match self {
            Axis::X => "first",
            Axis::Y => "second",
            Axis::Z => "third",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Accumulates `f` into `target`.
#[inline]
pub fn accumulate(target: &mut Vec3, f: Vec3) {
    target[0] += f[0];
    target[1] += f[1];
    target[2] += f[2];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]), [0.0, 0.0, -1.0]);
    }

    #[test]
    fn norm_of_pythagorean_triple() {
        assert_eq!(norm([3.0, 4.0, 0.0]), 5.0);
    }

    #[test]
    fn accumulate_is_additive() {
        let mut f = [1.0, 2.0, 3.0];
        accumulate(&mut f, [0.5, -2.0, 1.0]);
        assert_eq!(f, [1.5, 0.0, 4.0]);
    }

    #[test]
    fn axis_names() {
        assert_eq!(Axis::X.to_string(), "x");
        assert_eq!(Axis::Z.ordinal(), "third");
        assert_eq!(Axis::Y.index(), 1);
    }
}
