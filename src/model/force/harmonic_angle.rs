use crate::context::KernelForceImpl;
use crate::model::error::{Error, check_index};
use crate::platform::kernel::kind;

/// One harmonic angle term, `E = ½·k·(θ − angle)²`, with `particle2` at the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngleParams {
    pub particle1: usize,
    pub particle2: usize,
    pub particle3: usize,
    /// Equilibrium angle in radians.
    pub angle: f64,
    /// Force constant in kJ/mol/rad².
    pub k: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarmonicAngleForce {
    angles: Vec<AngleParams>,
}

impl HarmonicAngleForce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_angles(num_angles: usize) -> Self {
        Self {
            angles: vec![AngleParams::default(); num_angles],
        }
    }

    #[inline]
    pub fn num_angles(&self) -> usize {
        self.angles.len()
    }

    #[inline]
    pub fn angles(&self) -> &[AngleParams] {
        &self.angles
    }

    pub fn add_angle(
        &mut self,
        particle1: usize,
        particle2: usize,
        particle3: usize,
        angle: f64,
        k: f64,
    ) -> usize {
        self.angles.push(AngleParams {
            particle1,
            particle2,
            particle3,
            angle,
            k,
        });
        self.angles.len() - 1
    }

    pub fn angle_parameters(&self, index: usize) -> Result<AngleParams, Error> {
        let index = check_index("angle", index, self.angles.len())?;
        Ok(self.angles[index])
    }

    pub fn set_angle_parameters(&mut self, index: usize, params: AngleParams) -> Result<(), Error> {
        let index = check_index("angle", index, self.angles.len())?;
        self.angles[index] = params;
        Ok(())
    }

    pub fn create_impl(&self) -> HarmonicAngleForceImpl<'_> {
        KernelForceImpl::new("HarmonicAngleForce", self)
    }
}

pub type HarmonicAngleForceImpl<'a> =
    KernelForceImpl<'a, HarmonicAngleForce, kind::CalcHarmonicAngleForce>;
