//! Simulation contexts and the runtime bindings they own.
//!
//! A [`SimulationContext`] ties a [`System`] and an [`Integrator`] to one
//! [`Platform`]. Building it creates one [`ForceImpl`] per force and one
//! [`IntegratorImpl`], resolves every kernel they need, and initialises them;
//! afterwards the context evaluates forces and energies and advances the
//! particle state.
//!
//! Kernels see the context through a read-only [`ContextView`]. The force
//! buffer is passed to them separately so each force can add its
//! contribution in place.

mod force_impl;
mod integrator_impl;

pub use force_impl::{ForceImpl, KernelForceImpl};
pub use integrator_impl::{IntegratorImpl, VerletIntegratorImpl};

use std::fmt;
use std::sync::Arc;

use crate::model::integrator::Integrator;
use crate::model::system::System;
use crate::model::vec3::Vec3;
use crate::platform::{Error, Platform};

/// Mutable per-particle state owned by a context.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextState {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    time: f64,
}

impl ContextState {
    /// Zeroed state for `num_particles` particles at time zero.
    pub fn new(num_particles: usize) -> Self {
        Self {
            positions: vec![[0.0; 3]; num_particles],
            velocities: vec![[0.0; 3]; num_particles],
            time: 0.0,
        }
    }

    #[inline]
    pub fn num_particles(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    #[inline]
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    #[inline]
    pub fn velocities_mut(&mut self) -> &mut [Vec3] {
        &mut self.velocities
    }

    /// Both per-particle arrays at once, for update rules that read one while
    /// writing the other.
    pub fn positions_and_velocities_mut(&mut self) -> (&mut [Vec3], &mut [Vec3]) {
        (&mut self.positions, &mut self.velocities)
    }

    /// Simulation time in picoseconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }
}

/// Read-only view of a context handed to kernels.
#[derive(Debug, Clone, Copy)]
pub struct ContextView<'c> {
    platform: &'c Platform,
    system: &'c System,
    state: &'c ContextState,
}

impl<'c> ContextView<'c> {
    pub fn new(platform: &'c Platform, system: &'c System, state: &'c ContextState) -> Self {
        Self {
            platform,
            system,
            state,
        }
    }

    #[inline]
    pub fn platform(&self) -> &'c Platform {
        self.platform
    }

    #[inline]
    pub fn system(&self) -> &'c System {
        self.system
    }

    #[inline]
    pub fn state(&self) -> &'c ContextState {
        self.state
    }

    #[inline]
    pub fn positions(&self) -> &'c [Vec3] {
        self.state.positions()
    }

    #[inline]
    pub fn velocities(&self) -> &'c [Vec3] {
        self.state.velocities()
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.state.time()
    }

    /// Checks that the state holds one position and one velocity per
    /// particle of the system.
    pub fn check_particle_counts(&self) -> Result<(), Error> {
        let expected = self.system.num_particles();
        check_particle_count("positions", expected, self.positions().len())?;
        check_particle_count("velocities", expected, self.velocities().len())
    }
}

/// Snapshot of a context: particle state plus the forces and energies
/// evaluated for it.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub time: f64,
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub forces: Vec<Vec3>,
    /// kJ/mol
    pub potential_energy: f64,
    /// kJ/mol
    pub kinetic_energy: f64,
}

impl State {
    #[inline]
    pub fn total_energy(&self) -> f64 {
        self.potential_energy + self.kinetic_energy
    }
}

/// A system and integrator bound to a platform, plus the evolving particle
/// state.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mdkernel::{
///     HarmonicBondForce, Integrator, Platform, SimulationContext, System, VerletIntegrator,
/// };
///
/// let mut system = System::new();
/// system.add_particle(39.948);
/// system.add_particle(39.948);
/// let mut bonds = HarmonicBondForce::new();
/// bonds.add_bond(0, 1, 0.1, 1000.0);
/// system.add_force(bonds);
///
/// let integrator: Integrator = VerletIntegrator::new(0.001).unwrap().into();
/// let mut context =
///     SimulationContext::new(&system, &integrator, Arc::new(Platform::reference())).unwrap();
/// context.set_positions(&[[0.0, 0.0, 0.0], [0.12, 0.0, 0.0]]).unwrap();
///
/// let energy = context.calc_potential_energy().unwrap();
/// assert!((energy - 0.2).abs() < 1e-12);
/// ```
pub struct SimulationContext<'a> {
    system: &'a System,
    integrator: &'a Integrator,
    platform: Arc<Platform>,
    state: ContextState,
    force_impls: Vec<Box<dyn ForceImpl + 'a>>,
    integrator_impl: Box<dyn IntegratorImpl + 'a>,
}

impl<'a> SimulationContext<'a> {
    /// Builds the bindings for every force and the integrator and initialises
    /// them against `platform`.
    ///
    /// All required kernels are checked before any is created, so a platform
    /// lacking one fails with [`Error::KernelNotFound`] without side effects.
    /// Any kernel creation or initialisation error aborts the build.
    pub fn new(
        system: &'a System,
        integrator: &'a Integrator,
        platform: Arc<Platform>,
    ) -> Result<Self, Error> {
        let mut force_impls: Vec<Box<dyn ForceImpl + 'a>> = system
            .forces()
            .iter()
            .map(|force| force.create_impl())
            .collect();
        let mut integrator_impl = integrator.create_impl();

        let required: Vec<&'static str> = force_impls
            .iter()
            .flat_map(|imp| imp.kernel_names())
            .chain(integrator_impl.kernel_names())
            .collect();
        if let Some(missing) = platform.missing_kernels(&required).first() {
            return Err(Error::kernel_not_found(*missing, platform.name()));
        }

        let state = ContextState::new(system.num_particles());
        {
            let view = ContextView::new(&platform, system, &state);
            for imp in &mut force_impls {
                imp.initialize(&view)?;
            }
            integrator_impl.initialize(&view)?;
        }

        log::info!(
            "context ready on platform '{}': {} particles, {} forces, {}",
            platform.name(),
            system.num_particles(),
            force_impls.len(),
            integrator_impl.integrator_name()
        );

        Ok(Self {
            system,
            integrator,
            platform,
            state,
            force_impls,
            integrator_impl,
        })
    }

    #[inline]
    pub fn platform(&self) -> &Arc<Platform> {
        &self.platform
    }

    #[inline]
    pub fn system(&self) -> &'a System {
        self.system
    }

    #[inline]
    pub fn integrator(&self) -> &'a Integrator {
        self.integrator
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.state.time()
    }

    pub fn set_time(&mut self, time: f64) {
        self.state.set_time(time);
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        self.state.positions()
    }

    #[inline]
    pub fn velocities(&self) -> &[Vec3] {
        self.state.velocities()
    }

    /// Replaces all positions (nm).
    pub fn set_positions(&mut self, positions: &[Vec3]) -> Result<(), Error> {
        self.check_count("positions", positions.len())?;
        self.state.positions_mut().copy_from_slice(positions);
        Ok(())
    }

    /// Replaces all velocities (nm/ps).
    pub fn set_velocities(&mut self, velocities: &[Vec3]) -> Result<(), Error> {
        self.check_count("velocities", velocities.len())?;
        self.state.velocities_mut().copy_from_slice(velocities);
        Ok(())
    }

    /// Names of every kernel used by this context, forces first, then the
    /// integrator's.
    pub fn kernel_names(&self) -> Vec<&'static str> {
        self.force_impls
            .iter()
            .flat_map(|imp| imp.kernel_names())
            .chain(self.integrator_impl.kernel_names())
            .collect()
    }

    /// The bindings created for the system's forces, in system order.
    pub fn force_impls(&self) -> impl Iterator<Item = &dyn ForceImpl> {
        self.force_impls.iter().map(|imp| imp.as_ref() as &dyn ForceImpl)
    }

    pub fn view(&self) -> ContextView<'_> {
        ContextView::new(&self.platform, self.system, &self.state)
    }

    /// Total force on every particle, summed over all forces.
    pub fn calc_forces(&self) -> Result<Vec<Vec3>, Error> {
        let view = self.view();
        let mut forces = vec![[0.0; 3]; self.system.num_particles()];
        for imp in &self.force_impls {
            imp.calc_forces(&view, &mut forces)?;
        }
        Ok(forces)
    }

    /// Total potential energy in kJ/mol.
    pub fn calc_potential_energy(&self) -> Result<f64, Error> {
        let view = self.view();
        self.force_impls
            .iter()
            .map(|imp| imp.calc_energy(&view))
            .sum()
    }

    /// Kinetic energy in kJ/mol as computed by the integrator's kernel.
    pub fn calc_kinetic_energy(&self) -> Result<f64, Error> {
        self.integrator_impl.calc_kinetic_energy(&self.view())
    }

    /// Advances the simulation by `steps` integration steps.
    pub fn step(&mut self, steps: usize) -> Result<(), Error> {
        for _ in 0..steps {
            let forces = self.calc_forces()?;
            self.integrator_impl
                .step(self.system, &mut self.state, &forces)?;
            log::trace!("stepped to t = {:.6} ps", self.state.time());
        }
        Ok(())
    }

    /// Evaluates forces and energies at the current state.
    pub fn state(&self) -> Result<State, Error> {
        Ok(State {
            time: self.state.time(),
            positions: self.state.positions().to_vec(),
            velocities: self.state.velocities().to_vec(),
            forces: self.calc_forces()?,
            potential_energy: self.calc_potential_energy()?,
            kinetic_energy: self.calc_kinetic_energy()?,
        })
    }

    fn check_count(&self, what: &'static str, found: usize) -> Result<(), Error> {
        check_particle_count(what, self.system.num_particles(), found)
    }
}

/// Fails with [`Error::ParticleCountMismatch`] unless `found == expected`.
pub(crate) fn check_particle_count(
    what: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), Error> {
    if found == expected {
        Ok(())
    } else {
        Err(Error::ParticleCountMismatch {
            what,
            expected,
            found,
        })
    }
}

impl fmt::Debug for SimulationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationContext")
            .field("platform", &self.platform.name())
            .field("num_particles", &self.system.num_particles())
            .field("kernels", &self.kernel_names())
            .field("time", &self.state.time())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::force::{HarmonicBondForce, NonbondedForce};
    use crate::model::integrator::VerletIntegrator;
    use crate::platform::reference::ReferenceKernelFactory;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn dimer() -> System {
        let mut system = System::new();
        system.add_particle(12.0);
        system.add_particle(12.0);
        let mut bonds = HarmonicBondForce::new();
        bonds.add_bond(0, 1, 0.1, 1000.0);
        system.add_force(bonds);
        system
    }

    fn verlet() -> Integrator {
        VerletIntegrator::new(0.001).unwrap().into()
    }

    #[test]
    fn kernel_names_cover_forces_then_integrator() {
        let system = dimer();
        let integrator = verlet();
        let context =
            SimulationContext::new(&system, &integrator, Arc::new(Platform::reference())).unwrap();

        assert_eq!(
            context.kernel_names(),
            vec![
                "CalcHarmonicBondForceKernel",
                "IntegrateVerletStepKernel",
                "CalcKineticEnergyKernel"
            ]
        );
        assert!(context.force_impls().all(|imp| imp.is_initialized()));
    }

    #[test]
    fn missing_kernel_fails_before_any_initialisation() {
        let mut system = dimer();
        system.add_force(NonbondedForce::with_counts(2, 0));
        let integrator = verlet();
        let platform = Platform::builder("NoNonbonded")
            .register_kernel_factories(
                &[
                    "CalcHarmonicBondForceKernel",
                    "IntegrateVerletStepKernel",
                    "CalcKineticEnergyKernel",
                ],
                Arc::new(ReferenceKernelFactory),
            )
            .build();

        let err = SimulationContext::new(&system, &integrator, Arc::new(platform)).unwrap_err();
        assert!(matches!(
            err,
            Error::KernelNotFound { ref name, ref platform }
                if name == "CalcNonbondedForceKernel" && platform == "NoNonbonded"
        ));
    }

    #[test]
    fn particle_count_is_checked() {
        let system = dimer();
        let integrator = verlet();
        let mut context =
            SimulationContext::new(&system, &integrator, Arc::new(Platform::reference())).unwrap();

        let err = context.set_positions(&[[0.0; 3]]).unwrap_err();
        assert!(matches!(
            err,
            Error::ParticleCountMismatch {
                what: "positions",
                expected: 2,
                found: 1
            }
        ));
        assert_eq!(context.positions(), &[[0.0; 3]; 2]);
        assert!(context.set_velocities(&[[0.0; 3]; 3]).is_err());
    }

    #[test]
    fn forces_and_energy_of_stretched_bond() {
        let system = dimer();
        let integrator = verlet();
        let mut context =
            SimulationContext::new(&system, &integrator, Arc::new(Platform::reference())).unwrap();
        context
            .set_positions(&[[0.0, 0.0, 0.0], [0.0, 0.12, 0.0]])
            .unwrap();

        let state = context.state().unwrap();
        assert!(approx_eq(state.potential_energy, 0.2, 1e-12));
        assert!(approx_eq(state.forces[0][1], 20.0, 1e-9));
        assert!(approx_eq(state.forces[1][1], -20.0, 1e-9));
        assert_eq!(state.kinetic_energy, 0.0);
        assert_eq!(state.total_energy(), state.potential_energy);
    }

    #[test]
    fn step_advances_time_and_moves_particles() {
        let system = dimer();
        let integrator = verlet();
        let mut context =
            SimulationContext::new(&system, &integrator, Arc::new(Platform::reference())).unwrap();
        context
            .set_positions(&[[0.0, 0.0, 0.0], [0.12, 0.0, 0.0]])
            .unwrap();

        context.step(10).unwrap();
        assert!(approx_eq(context.time(), 0.01, 1e-12));
        assert!(context.positions()[0][0] > 0.0);
        assert!(context.positions()[1][0] < 0.12);
        assert!(context.calc_kinetic_energy().unwrap() > 0.0);

        context.set_time(0.0);
        assert_eq!(context.time(), 0.0);
    }
}
