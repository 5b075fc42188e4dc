use crate::context::KernelForceImpl;
use crate::model::error::{Error, check_index};
use crate::platform::kernel::kind;

/// Parameters of one harmonic bond, `E = ½·k·(r − length)²`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BondParams {
    pub particle1: usize,
    pub particle2: usize,
    /// Equilibrium length in nm.
    pub length: f64,
    /// Force constant in kJ/mol/nm².
    pub k: f64,
}

/// Harmonic bond stretching between pairs of particles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarmonicBondForce {
    bonds: Vec<BondParams>,
}

impl HarmonicBondForce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a force with `num_bonds` zeroed bonds to be filled in with
    /// [`set_bond_parameters`](Self::set_bond_parameters).
    pub fn with_bonds(num_bonds: usize) -> Self {
        Self {
            bonds: vec![BondParams::default(); num_bonds],
        }
    }

    #[inline]
    pub fn num_bonds(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn bonds(&self) -> &[BondParams] {
        &self.bonds
    }

    /// Appends a bond and returns its index.
    pub fn add_bond(&mut self, particle1: usize, particle2: usize, length: f64, k: f64) -> usize {
        self.bonds.push(BondParams {
            particle1,
            particle2,
            length,
            k,
        });
        self.bonds.len() - 1
    }

    pub fn bond_parameters(&self, index: usize) -> Result<BondParams, Error> {
        let index = check_index("bond", index, self.bonds.len())?;
        Ok(self.bonds[index])
    }

    pub fn set_bond_parameters(
        &mut self,
        index: usize,
        particle1: usize,
        particle2: usize,
        length: f64,
        k: f64,
    ) -> Result<(), Error> {
        let index = check_index("bond", index, self.bonds.len())?;
        self.bonds[index] = BondParams {
            particle1,
            particle2,
            length,
            k,
        };
        Ok(())
    }

    /// Creates the runtime binding evaluated through the
    /// `CalcHarmonicBondForceKernel` kernel.
    pub fn create_impl(&self) -> HarmonicBondForceImpl<'_> {
        KernelForceImpl::new("HarmonicBondForce", self)
    }
}

/// Runtime binding of a [`HarmonicBondForce`] to its platform kernel.
pub type HarmonicBondForceImpl<'a> =
    KernelForceImpl<'a, HarmonicBondForce, kind::CalcHarmonicBondForce>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ForceImpl;

    #[test]
    fn add_then_get_round_trip() {
        let mut force = HarmonicBondForce::new();
        let idx = force.add_bond(0, 1, 0.1, 1000.0);
        assert_eq!(idx, 0);
        assert_eq!(
            force.bond_parameters(0).unwrap(),
            BondParams {
                particle1: 0,
                particle2: 1,
                length: 0.1,
                k: 1000.0
            }
        );
    }

    #[test]
    fn sized_constructor_then_set() {
        let mut force = HarmonicBondForce::with_bonds(2);
        force.set_bond_parameters(1, 3, 4, 0.15, 250.0).unwrap();
        assert_eq!(force.num_bonds(), 2);
        assert_eq!(force.bond_parameters(0).unwrap(), BondParams::default());
        assert_eq!(force.bond_parameters(1).unwrap().particle2, 4);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut force = HarmonicBondForce::with_bonds(1);
        assert!(matches!(
            force.bond_parameters(1),
            Err(Error::IndexOutOfRange {
                kind: "bond",
                index: 1,
                len: 1
            })
        ));
        assert!(force.set_bond_parameters(5, 0, 1, 0.1, 1.0).is_err());
        assert_eq!(force.bond_parameters(0).unwrap(), BondParams::default());
    }

    #[test]
    fn kernel_names_before_initialize() {
        let force = HarmonicBondForce::new();
        let imp = force.create_impl();
        assert_eq!(imp.kernel_names(), vec!["CalcHarmonicBondForceKernel"]);
        assert!(!imp.is_initialized());
    }
}
