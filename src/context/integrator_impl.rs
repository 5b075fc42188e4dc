use std::fmt;

use super::{ContextState, ContextView, check_particle_count};
use crate::model::integrator::VerletIntegrator;
use crate::model::system::System;
use crate::model::vec3::Vec3;
use crate::platform::Error;
use crate::platform::kernel::{Kernel, KernelKind, kind};

/// Runtime binding of an integrator to its step and kinetic energy kernels.
pub trait IntegratorImpl {
    fn integrator_name(&self) -> &'static str;

    /// Names of the kernels this binding needs, independent of its state.
    fn kernel_names(&self) -> Vec<&'static str>;

    fn is_initialized(&self) -> bool;

    /// Resolves and initialises the kernels, once; see
    /// [`ForceImpl::initialize`](super::ForceImpl::initialize).
    fn initialize(&mut self, context: &ContextView<'_>) -> Result<(), Error>;

    /// Advances `state` by one step, including its time, given the total
    /// forces at the current positions.
    fn step(
        &mut self,
        system: &System,
        state: &mut ContextState,
        forces: &[Vec3],
    ) -> Result<(), Error>;

    fn calc_kinetic_energy(&self, context: &ContextView<'_>) -> Result<f64, Error>;
}

struct VerletKernels {
    step: Kernel<kind::IntegrateVerletStep>,
    kinetic: Kernel<kind::CalcKineticEnergy>,
}

/// Binding of a [`VerletIntegrator`].
pub struct VerletIntegratorImpl<'a> {
    owner: &'a VerletIntegrator,
    kernels: Option<VerletKernels>,
}

const VERLET: &str = "VerletIntegrator";

impl<'a> VerletIntegratorImpl<'a> {
    pub fn new(owner: &'a VerletIntegrator) -> Self {
        Self {
            owner,
            kernels: None,
        }
    }

    fn kernels(&self) -> Result<&VerletKernels, Error> {
        self.kernels
            .as_ref()
            .ok_or(Error::NotInitialized { component: VERLET })
    }
}

impl IntegratorImpl for VerletIntegratorImpl<'_> {
    fn integrator_name(&self) -> &'static str {
        VERLET
    }

    fn kernel_names(&self) -> Vec<&'static str> {
        vec![
            kind::IntegrateVerletStep::NAME,
            kind::CalcKineticEnergy::NAME,
        ]
    }

    fn is_initialized(&self) -> bool {
        self.kernels.is_some()
    }

    fn initialize(&mut self, context: &ContextView<'_>) -> Result<(), Error> {
        if self.kernels.is_some() {
            return Err(Error::AlreadyInitialized { component: VERLET });
        }
        let platform = context.platform();
        let mut step = platform.create_kernel::<kind::IntegrateVerletStep>(context)?;
        step.initialize(context.system(), self.owner)?;
        let mut kinetic = platform.create_kernel::<kind::CalcKineticEnergy>(context)?;
        kinetic.initialize(context.system())?;

        log::debug!(
            "{VERLET} bound to kernels '{}' and '{}'",
            step.name(),
            kinetic.name()
        );
        self.kernels = Some(VerletKernels { step, kinetic });
        Ok(())
    }

    fn step(
        &mut self,
        system: &System,
        state: &mut ContextState,
        forces: &[Vec3],
    ) -> Result<(), Error> {
        let kernels = self
            .kernels
            .as_mut()
            .ok_or(Error::NotInitialized { component: VERLET })?;
        let expected = system.num_particles();
        check_particle_count("positions", expected, state.positions().len())?;
        check_particle_count("velocities", expected, state.velocities().len())?;
        check_particle_count("forces", expected, forces.len())?;
        kernels.step.execute(system, self.owner, state, forces)?;
        state.set_time(state.time() + self.owner.step_size());
        Ok(())
    }

    fn calc_kinetic_energy(&self, context: &ContextView<'_>) -> Result<f64, Error> {
        let kernels = self.kernels()?;
        context.check_particle_counts()?;
        Ok(kernels.kinetic.execute(context)?)
    }
}

impl fmt::Debug for VerletIntegratorImpl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerletIntegratorImpl")
            .field("step_size", &self.owner.step_size())
            .field("initialized", &self.kernels.is_some())
            .finish()
    }
}
