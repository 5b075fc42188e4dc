//! Portable CPU platform.
//!
//! Every kernel name defined by the crate is served by one shared
//! [`ReferenceKernelFactory`]. Kernels compute in [`Real`] precision, copy
//! their parameters at initialisation, and validate particle indices against
//! the system, failing with [`KernelError`].

mod bonded;
mod error;
mod integrator;
mod nonbonded;

pub use bonded::{
    ReferenceCalcHarmonicAngleForceKernel, ReferenceCalcHarmonicBondForceKernel,
    ReferenceCalcPeriodicTorsionForceKernel,
};
pub use error::KernelError;
pub use integrator::{ReferenceCalcKineticEnergyKernel, ReferenceIntegrateVerletStepKernel};
pub use nonbonded::{ONE_4PI_EPS0, REACTION_FIELD_DIELECTRIC, ReferenceCalcNonbondedForceKernel};

use std::mem::size_of;
use std::sync::Arc;

use super::kernel::{KERNEL_NAMES, KernelImpl, KernelKind, kind};
use super::{Error, KernelFactory, Platform};
use crate::context::ContextView;

/// Floating point type used by the reference kernels.
pub type Real = f64;

pub const PLATFORM_NAME: &str = "Reference";

/// Builds the reference platform with every kernel registered.
pub fn platform() -> Platform {
    Platform::builder(PLATFORM_NAME)
        .register_kernel_factories(KERNEL_NAMES, Arc::new(ReferenceKernelFactory))
        .speed(1.0)
        .double_precision(size_of::<Real>() >= size_of::<f64>())
        .build()
}

/// Creates the reference implementation of any kernel name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceKernelFactory;

impl KernelFactory for ReferenceKernelFactory {
    fn create_kernel(&self, name: &str, _context: &ContextView<'_>) -> Result<KernelImpl, Error> {
        let kernel = match name {
            kind::CalcHarmonicBondForce::NAME => KernelImpl::CalcHarmonicBondForce(Box::new(
                ReferenceCalcHarmonicBondForceKernel::default(),
            )),
            kind::CalcHarmonicAngleForce::NAME => KernelImpl::CalcHarmonicAngleForce(Box::new(
                ReferenceCalcHarmonicAngleForceKernel::default(),
            )),
            kind::CalcPeriodicTorsionForce::NAME => KernelImpl::CalcPeriodicTorsionForce(
                Box::new(ReferenceCalcPeriodicTorsionForceKernel::default()),
            ),
            kind::CalcNonbondedForce::NAME => KernelImpl::CalcNonbondedForce(Box::new(
                ReferenceCalcNonbondedForceKernel::default(),
            )),
            kind::IntegrateVerletStep::NAME => KernelImpl::IntegrateVerletStep(Box::new(
                ReferenceIntegrateVerletStepKernel::default(),
            )),
            kind::CalcKineticEnergy::NAME => KernelImpl::CalcKineticEnergy(Box::new(
                ReferenceCalcKineticEnergyKernel::default(),
            )),
            _ => return Err(Error::kernel_not_found(name, PLATFORM_NAME)),
        };
        Ok(kernel)
    }
}
