use crate::context::KernelForceImpl;
use crate::model::error::{Error, check_index};
use crate::platform::kernel::kind;

/// One periodic torsion, `E = k·(1 + cos(periodicity·φ − phase))`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TorsionParams {
    pub particle1: usize,
    pub particle2: usize,
    pub particle3: usize,
    pub particle4: usize,
    pub periodicity: u32,
    /// Phase offset in radians.
    pub phase: f64,
    /// Barrier height in kJ/mol.
    pub k: f64,
}

/// Proper dihedral terms expanded as a cosine series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodicTorsionForce {
    torsions: Vec<TorsionParams>,
}

impl PeriodicTorsionForce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_torsions(num_torsions: usize) -> Self {
        Self {
            torsions: vec![TorsionParams::default(); num_torsions],
        }
    }

    #[inline]
    pub fn num_torsions(&self) -> usize {
        self.torsions.len()
    }

    #[inline]
    pub fn torsions(&self) -> &[TorsionParams] {
        &self.torsions
    }

    pub fn add_torsion(&mut self, params: TorsionParams) -> usize {
        self.torsions.push(params);
        self.torsions.len() - 1
    }

    pub fn torsion_parameters(&self, index: usize) -> Result<TorsionParams, Error> {
        let index = check_index("torsion", index, self.torsions.len())?;
        Ok(self.torsions[index])
    }

    pub fn set_torsion_parameters(
        &mut self,
        index: usize,
        params: TorsionParams,
    ) -> Result<(), Error> {
        let index = check_index("torsion", index, self.torsions.len())?;
        self.torsions[index] = params;
        Ok(())
    }

    pub fn create_impl(&self) -> PeriodicTorsionForceImpl<'_> {
        KernelForceImpl::new("PeriodicTorsionForce", self)
    }
}

pub type PeriodicTorsionForceImpl<'a> =
    KernelForceImpl<'a, PeriodicTorsionForce, kind::CalcPeriodicTorsionForce>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TorsionParams {
        TorsionParams {
            particle1: 0,
            particle2: 1,
            particle3: 2,
            particle4: 3,
            periodicity: 3,
            phase: 0.0,
            k: 0.65,
        }
    }

    #[test]
    fn add_then_get_round_trip() {
        let mut force = PeriodicTorsionForce::new();
        let idx = force.add_torsion(sample());
        assert_eq!(force.torsion_parameters(idx).unwrap(), sample());
    }

    #[test]
    fn failed_set_leaves_torsions_untouched() {
        let mut force = PeriodicTorsionForce::with_torsions(1);
        assert!(force.set_torsion_parameters(2, sample()).is_err());
        assert_eq!(force.torsions(), &[TorsionParams::default()]);
    }
}
