//! Declarative force definitions.
//!
//! A force only stores parameters. Evaluation happens through the runtime
//! binding returned by [`Force::create_impl`], which asks the platform for the
//! kernel that implements it. The set of forces is closed: [`Force`] lists
//! every variant, and `create_impl` is the single table mapping a variant to
//! its binding.

mod harmonic_angle;
mod harmonic_bond;
mod nonbonded;
mod periodic_torsion;

pub use harmonic_angle::{AngleParams, HarmonicAngleForce, HarmonicAngleForceImpl};
pub use harmonic_bond::{BondParams, HarmonicBondForce, HarmonicBondForceImpl};
pub use nonbonded::{
    AtomParams, Nonbonded14Params, NonbondedForce, NonbondedForceImpl, NonbondedMethod,
};
pub use periodic_torsion::{PeriodicTorsionForce, PeriodicTorsionForceImpl, TorsionParams};

use crate::context::ForceImpl;

/// One potential energy term of a [`System`](crate::System).
#[derive(Debug, Clone, PartialEq)]
pub enum Force {
    HarmonicBond(HarmonicBondForce),
    HarmonicAngle(HarmonicAngleForce),
    PeriodicTorsion(PeriodicTorsionForce),
    Nonbonded(NonbondedForce),
}

impl Force {
    pub fn name(&self) -> &'static str {
        match self {
            Force::HarmonicBond(_) => "HarmonicBondForce",
            Force::HarmonicAngle(_) => "HarmonicAngleForce",
            Force::PeriodicTorsion(_) => "PeriodicTorsionForce",
            Force::Nonbonded(_) => "NonbondedForce",
        }
    }

    /// Creates a new, uninitialised runtime binding for this force.
    pub fn create_impl(&self) -> Box<dyn ForceImpl + '_> {
        match self {
            Force::HarmonicBond(f) => Box::new(f.create_impl()),
            Force::HarmonicAngle(f) => Box::new(f.create_impl()),
            Force::PeriodicTorsion(f) => Box::new(f.create_impl()),
            Force::Nonbonded(f) => Box::new(f.create_impl()),
        }
    }
}

impl From<HarmonicBondForce> for Force {
    fn from(force: HarmonicBondForce) -> Self {
        Force::HarmonicBond(force)
    }
}

impl From<HarmonicAngleForce> for Force {
    fn from(force: HarmonicAngleForce) -> Self {
        Force::HarmonicAngle(force)
    }
}

impl From<PeriodicTorsionForce> for Force {
    fn from(force: PeriodicTorsionForce) -> Self {
        Force::PeriodicTorsion(force)
    }
}

impl From<NonbondedForce> for Force {
    fn from(force: NonbondedForce) -> Self {
        Force::Nonbonded(force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_variant_requires_its_own_kernel() {
        let forces: Vec<Force> = vec![
            HarmonicBondForce::new().into(),
            HarmonicAngleForce::new().into(),
            PeriodicTorsionForce::new().into(),
            NonbondedForce::new().into(),
        ];

        let names: Vec<Vec<&str>> = forces
            .iter()
            .map(|f| f.create_impl().kernel_names())
            .collect();

        assert_eq!(
            names,
            vec![
                vec!["CalcHarmonicBondForceKernel"],
                vec!["CalcHarmonicAngleForceKernel"],
                vec!["CalcPeriodicTorsionForceKernel"],
                vec!["CalcNonbondedForceKernel"],
            ]
        );
    }

    #[test]
    fn impl_reports_force_name() {
        let force: Force = NonbondedForce::new().into();
        assert_eq!(force.name(), "NonbondedForce");
        assert_eq!(force.create_impl().force_name(), "NonbondedForce");
    }
}
