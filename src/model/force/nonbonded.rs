//! Coulomb and Lennard-Jones interactions between all particle pairs.
//!
//! Per-particle records hold a charge, a Lennard-Jones radius and a well
//! depth. Pairs separated by one to three bonds are excluded from the
//! all-pairs sum; the 1-4 pairs are instead listed explicitly with their own
//! (usually scaled) parameters.

use std::fmt;

use crate::context::KernelForceImpl;
use crate::model::error::{Error, check_index};
use crate::model::vec3::{Axis, Vec3};
use crate::platform::kernel::kind;

/// How interactions beyond the cutoff distance are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NonbondedMethod {
    /// Every pair interacts; no periodicity.
    #[default]
    NoCutoff,
    /// Pairs farther apart than the cutoff are ignored.
    CutoffNonPeriodic,
    /// Cutoff plus periodic boundary conditions under the minimum image
    /// convention.
    CutoffPeriodic,
}

impl NonbondedMethod {
    #[inline]
    pub fn uses_cutoff(self) -> bool {
        !matches!(self, NonbondedMethod::NoCutoff)
    }

    #[inline]
    pub fn is_periodic(self) -> bool {
        matches!(self, NonbondedMethod::CutoffPeriodic)
    }
}

impl fmt::Display for NonbondedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonbondedMethod::NoCutoff => write!(f, "NoCutoff"),
            NonbondedMethod::CutoffNonPeriodic => write!(f, "CutoffNonPeriodic"),
            NonbondedMethod::CutoffPeriodic => write!(f, "CutoffPeriodic"),
        }
    }
}

/// Nonbonded parameters of a single particle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AtomParams {
    /// Charge in units of the proton charge.
    pub charge: f64,
    /// Lennard-Jones radius in nm.
    pub radius: f64,
    /// Lennard-Jones well depth in kJ/mol.
    pub depth: f64,
}

/// Parameters of one explicitly listed 1-4 interaction.
///
/// `charge` is the product of the two partial charges and `radius`/`depth`
/// are the already combined Lennard-Jones parameters of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Nonbonded14Params {
    pub particle1: usize,
    pub particle2: usize,
    pub charge: f64,
    pub radius: f64,
    pub depth: f64,
}

const DEFAULT_BOX_EDGE: f64 = 2.0;
const DEFAULT_CUTOFF: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct NonbondedForce {
    atoms: Vec<AtomParams>,
    nb14s: Vec<Nonbonded14Params>,
    method: NonbondedMethod,
    cutoff_distance: f64,
    periodic_box_vectors: [Vec3; 3],
}

impl Default for NonbondedForce {
    fn default() -> Self {
        Self {
            atoms: Vec::new(),
            nb14s: Vec::new(),
            method: NonbondedMethod::default(),
            cutoff_distance: DEFAULT_CUTOFF,
            periodic_box_vectors: [
                [DEFAULT_BOX_EDGE, 0.0, 0.0],
                [0.0, DEFAULT_BOX_EDGE, 0.0],
                [0.0, 0.0, DEFAULT_BOX_EDGE],
            ],
        }
    }
}

impl NonbondedForce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a force with `num_atoms` particle records and `num_nonbonded14`
    /// pair records, all zeroed.
    pub fn with_counts(num_atoms: usize, num_nonbonded14: usize) -> Self {
        Self {
            atoms: vec![AtomParams::default(); num_atoms],
            nb14s: vec![Nonbonded14Params::default(); num_nonbonded14],
            ..Self::default()
        }
    }

    #[inline]
    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn num_nonbonded14(&self) -> usize {
        self.nb14s.len()
    }

    #[inline]
    pub fn atoms(&self) -> &[AtomParams] {
        &self.atoms
    }

    #[inline]
    pub fn nonbonded14s(&self) -> &[Nonbonded14Params] {
        &self.nb14s
    }

    #[inline]
    pub fn nonbonded_method(&self) -> NonbondedMethod {
        self.method
    }

    pub fn set_nonbonded_method(&mut self, method: NonbondedMethod) {
        self.method = method;
    }

    /// Cutoff distance in nm; ignored when the method is
    /// [`NoCutoff`](NonbondedMethod::NoCutoff).
    #[inline]
    pub fn cutoff_distance(&self) -> f64 {
        self.cutoff_distance
    }

    pub fn set_cutoff_distance(&mut self, distance: f64) -> Result<(), Error> {
        if !(distance.is_finite() && distance > 0.0) {
            return Err(Error::invalid_parameter(
                "cutoff distance",
                format!("must be a positive finite length, got {distance}"),
            ));
        }
        self.cutoff_distance = distance;
        Ok(())
    }

    /// Returns the periodic box vectors `(a, b, c)`.
    #[inline]
    pub fn periodic_box_vectors(&self) -> [Vec3; 3] {
        self.periodic_box_vectors
    }

    /// Replaces the periodic box vectors.
    ///
    /// `a` must be parallel to x, `b` to y and `c` to z, with off-axis
    /// components exactly zero. All three are checked before any is stored,
    /// so on error the previous vectors are kept.
    pub fn set_periodic_box_vectors(&mut self, a: Vec3, b: Vec3, c: Vec3) -> Result<(), Error> {
        for (axis, vector) in Axis::ALL.into_iter().zip([a, b, c]) {
            let off_axis = (0..3)
                .filter(|&i| i != axis.index())
                .any(|i| vector[i] != 0.0);
            if off_axis {
                return Err(Error::NonAxisAlignedBoxVector { axis, vector });
            }
        }
        self.periodic_box_vectors = [a, b, c];
        Ok(())
    }

    /// Edge lengths of the rectangular periodic box.
    pub fn box_size(&self) -> Vec3 {
        let [a, b, c] = self.periodic_box_vectors;
        [a[0], b[1], c[2]]
    }

    /// Appends a particle record and returns its index.
    pub fn add_atom(&mut self, charge: f64, radius: f64, depth: f64) -> usize {
        self.atoms.push(AtomParams {
            charge,
            radius,
            depth,
        });
        self.atoms.len() - 1
    }

    pub fn atom_parameters(&self, index: usize) -> Result<AtomParams, Error> {
        let index = check_index("atom", index, self.atoms.len())?;
        Ok(self.atoms[index])
    }

    pub fn set_atom_parameters(
        &mut self,
        index: usize,
        charge: f64,
        radius: f64,
        depth: f64,
    ) -> Result<(), Error> {
        let index = check_index("atom", index, self.atoms.len())?;
        self.atoms[index] = AtomParams {
            charge,
            radius,
            depth,
        };
        Ok(())
    }

    /// Appends a 1-4 pair record and returns its index.
    pub fn add_nonbonded14(
        &mut self,
        particle1: usize,
        particle2: usize,
        charge: f64,
        radius: f64,
        depth: f64,
    ) -> usize {
        self.nb14s.push(Nonbonded14Params {
            particle1,
            particle2,
            charge,
            radius,
            depth,
        });
        self.nb14s.len() - 1
    }

    pub fn nonbonded14_parameters(&self, index: usize) -> Result<Nonbonded14Params, Error> {
        let index = check_index("nonbonded 1-4", index, self.nb14s.len())?;
        Ok(self.nb14s[index])
    }

    pub fn set_nonbonded14_parameters(
        &mut self,
        index: usize,
        particle1: usize,
        particle2: usize,
        charge: f64,
        radius: f64,
        depth: f64,
    ) -> Result<(), Error> {
        let index = check_index("nonbonded 1-4", index, self.nb14s.len())?;
        self.nb14s[index] = Nonbonded14Params {
            particle1,
            particle2,
            charge,
            radius,
            depth,
        };
        Ok(())
    }

    pub fn create_impl(&self) -> NonbondedForceImpl<'_> {
        KernelForceImpl::new("NonbondedForce", self)
    }
}

/// Runtime binding of a [`NonbondedForce`] to its platform kernel.
pub type NonbondedForceImpl<'a> = KernelForceImpl<'a, NonbondedForce, kind::CalcNonbondedForce>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cubic_two_nm_box() {
        let force = NonbondedForce::new();
        assert_eq!(force.nonbonded_method(), NonbondedMethod::NoCutoff);
        assert_eq!(force.cutoff_distance(), 1.0);
        assert_eq!(
            force.periodic_box_vectors(),
            [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]
        );
    }

    #[test]
    fn box_vectors_round_trip() {
        let mut force = NonbondedForce::new();
        let (a, b, c) = ([3.1, 0.0, 0.0], [0.0, 2.7, 0.0], [0.0, 0.0, 4.25]);
        force.set_periodic_box_vectors(a, b, c).unwrap();
        assert_eq!(force.periodic_box_vectors(), [a, b, c]);
        assert_eq!(force.box_size(), [3.1, 2.7, 4.25]);
    }

    #[test]
    fn rejects_each_misaligned_vector_without_partial_update() {
        let mut force = NonbondedForce::new();
        let before = force.periodic_box_vectors();

        let cases = [
            ([3.0, 0.1, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0], Axis::X),
            ([3.0, 0.0, 0.0], [0.0, 3.0, -0.5], [0.0, 0.0, 3.0], Axis::Y),
            ([3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [1e-9, 0.0, 3.0], Axis::Z),
        ];

        for (a, b, c, expected_axis) in cases {
            let err = force.set_periodic_box_vectors(a, b, c).unwrap_err();
            match err {
                Error::NonAxisAlignedBoxVector { axis, .. } => assert_eq!(axis, expected_axis),
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(force.periodic_box_vectors(), before);
        }
    }

    #[test]
    fn misalignment_message_names_the_vector() {
        let mut force = NonbondedForce::new();
        let err = force
            .set_periodic_box_vectors([2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.3, 2.0])
            .unwrap_err();
        assert!(
            err.to_string()
                .starts_with("third periodic box vector must be parallel to z")
        );
    }

    #[test]
    fn atom_parameters_round_trip() {
        let mut force = NonbondedForce::with_counts(3, 0);
        force.set_atom_parameters(2, -0.834, 0.315, 0.636).unwrap();
        let p = force.atom_parameters(2).unwrap();
        assert_eq!((p.charge, p.radius, p.depth), (-0.834, 0.315, 0.636));
        assert_eq!(force.atom_parameters(0).unwrap(), AtomParams::default());
    }

    #[test]
    fn nonbonded14_parameters_round_trip() {
        let mut force = NonbondedForce::with_counts(4, 1);
        force
            .set_nonbonded14_parameters(0, 0, 3, 0.05, 0.3, 0.2)
            .unwrap();
        assert_eq!(
            force.nonbonded14_parameters(0).unwrap(),
            Nonbonded14Params {
                particle1: 0,
                particle2: 3,
                charge: 0.05,
                radius: 0.3,
                depth: 0.2
            }
        );
    }

    #[test]
    fn accessors_are_bounds_checked() {
        let mut force = NonbondedForce::with_counts(2, 0);
        assert!(matches!(
            force.set_atom_parameters(2, 1.0, 1.0, 1.0),
            Err(Error::IndexOutOfRange { kind: "atom", .. })
        ));
        assert!(force.nonbonded14_parameters(0).is_err());
        assert!(force.set_nonbonded14_parameters(0, 0, 1, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn cutoff_must_be_positive() {
        let mut force = NonbondedForce::new();
        assert!(force.set_cutoff_distance(0.0).is_err());
        assert!(force.set_cutoff_distance(f64::NAN).is_err());
        assert_eq!(force.cutoff_distance(), 1.0);
        force.set_cutoff_distance(0.9).unwrap();
        assert_eq!(force.cutoff_distance(), 0.9);
    }

    #[test]
    fn method_flags() {
        assert!(!NonbondedMethod::NoCutoff.uses_cutoff());
        assert!(NonbondedMethod::CutoffNonPeriodic.uses_cutoff());
        assert!(!NonbondedMethod::CutoffNonPeriodic.is_periodic());
        assert!(NonbondedMethod::CutoffPeriodic.is_periodic());
    }
}
