use super::error::KernelError as ReferenceError;
use crate::context::{ContextState, ContextView};
use crate::model::integrator::VerletIntegrator;
use crate::model::system::System;
use crate::model::vec3::{Vec3, dot};
use crate::platform::kernel::{IntegratorKernel, KernelError, KineticEnergyKernel};

/// Inverse masses with zero standing for a fixed particle.
fn inverse_masses(system: &System) -> Result<Vec<f64>, ReferenceError> {
    system
        .masses()
        .iter()
        .enumerate()
        .map(|(index, &mass)| match mass {
            m if m < 0.0 => Err(ReferenceError::NegativeMass { index, mass }),
            m if m == 0.0 => Ok(0.0),
            m => Ok(1.0 / m),
        })
        .collect()
}

/// Leapfrog Verlet: velocities live at half steps.
#[derive(Debug, Default)]
pub struct ReferenceIntegrateVerletStepKernel {
    inverse_masses: Vec<f64>,
}

impl IntegratorKernel<VerletIntegrator> for ReferenceIntegrateVerletStepKernel {
    fn initialize(
        &mut self,
        system: &System,
        _integrator: &VerletIntegrator,
    ) -> Result<(), KernelError> {
        self.inverse_masses = inverse_masses(system)?;
        Ok(())
    }

    fn execute(
        &mut self,
        _system: &System,
        integrator: &VerletIntegrator,
        state: &mut ContextState,
        forces: &[Vec3],
    ) -> Result<(), KernelError> {
        let dt = integrator.step_size();
        let (positions, velocities) = state.positions_and_velocities_mut();
        for (((x, v), f), &inv_m) in positions
            .iter_mut()
            .zip(velocities.iter_mut())
            .zip(forces)
            .zip(&self.inverse_masses)
        {
            if inv_m == 0.0 {
                continue;
            }
            for axis in 0..3 {
                v[axis] += f[axis] * inv_m * dt;
                x[axis] += v[axis] * dt;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ReferenceCalcKineticEnergyKernel {
    masses: Vec<f64>,
}

impl KineticEnergyKernel for ReferenceCalcKineticEnergyKernel {
    fn initialize(&mut self, system: &System) -> Result<(), KernelError> {
        self.masses = system.masses().to_vec();
        Ok(())
    }

    fn execute(&self, context: &ContextView<'_>) -> Result<f64, KernelError> {
        let energy: f64 = self
            .masses
            .iter()
            .zip(context.velocities())
            .map(|(&m, &v)| 0.5 * m * dot(v, v))
            .sum();
        Ok(energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_particles_do_not_move() {
        let mut system = System::new();
        system.add_particle(0.0);
        system.add_particle(2.0);
        let verlet = VerletIntegrator::new(0.5).unwrap();

        let mut kernel = ReferenceIntegrateVerletStepKernel::default();
        kernel.initialize(&system, &verlet).unwrap();

        let mut state = ContextState::new(2);
        let forces = [[1.0, 0.0, 0.0], [4.0, 0.0, 0.0]];
        kernel.execute(&system, &verlet, &mut state, &forces).unwrap();

        assert_eq!(state.positions()[0], [0.0; 3]);
        assert_eq!(state.velocities()[0], [0.0; 3]);
        // v = 4 / 2 · 0.5 = 1, x = 1 · 0.5.
        assert_eq!(state.velocities()[1], [1.0, 0.0, 0.0]);
        assert_eq!(state.positions()[1], [0.5, 0.0, 0.0]);
    }

    #[test]
    fn negative_mass_is_rejected() {
        let mut system = System::new();
        system.add_particle(1.0);
        system.add_particle(-1.0);
        let verlet = VerletIntegrator::new(0.001).unwrap();

        let mut kernel = ReferenceIntegrateVerletStepKernel::default();
        let err = kernel.initialize(&system, &verlet).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ReferenceError>(),
            Some(&ReferenceError::NegativeMass {
                index: 1,
                mass: -1.0
            })
        );
    }
}
