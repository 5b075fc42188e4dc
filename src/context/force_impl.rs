use std::fmt;

use super::{ContextView, check_particle_count};
use crate::model::vec3::Vec3;
use crate::platform::Error;
use crate::platform::kernel::{ForceKernel, Kernel, KernelKind};

/// Runtime binding of one force to the kernel that evaluates it.
///
/// A binding starts uninitialised. [`initialize`](ForceImpl::initialize)
/// resolves the kernel from the context's platform exactly once; evaluation
/// before that fails with [`Error::NotInitialized`].
pub trait ForceImpl {
    /// Name of the force this binding evaluates.
    fn force_name(&self) -> &'static str;

    /// Names of the kernels this binding needs, independent of its state.
    fn kernel_names(&self) -> Vec<&'static str>;

    fn is_initialized(&self) -> bool;

    /// Resolves and initialises the kernel. A second call fails with
    /// [`Error::AlreadyInitialized`] and keeps the bound kernel.
    fn initialize(&mut self, context: &ContextView<'_>) -> Result<(), Error>;

    /// Adds this force's contribution to `forces`, which must hold one entry
    /// per particle.
    fn calc_forces(&self, context: &ContextView<'_>, forces: &mut [Vec3]) -> Result<(), Error>;

    /// This force's potential energy in kJ/mol.
    fn calc_energy(&self, context: &ContextView<'_>) -> Result<f64, Error>;
}

/// A [`ForceImpl`] that forwards every call to one kernel of kind `K`.
///
/// Borrows the force it was created from; the force must outlive the
/// binding.
pub struct KernelForceImpl<'a, F, K: KernelKind> {
    name: &'static str,
    owner: &'a F,
    kernel: Option<Kernel<K>>,
}

impl<'a, F, K: KernelKind> KernelForceImpl<'a, F, K> {
    pub fn new(name: &'static str, owner: &'a F) -> Self {
        Self {
            name,
            owner,
            kernel: None,
        }
    }

    /// The force this binding was created from.
    #[inline]
    pub fn owner(&self) -> &'a F {
        self.owner
    }

    fn kernel(&self) -> Result<&Kernel<K>, Error> {
        self.kernel.as_ref().ok_or(Error::NotInitialized {
            component: self.name,
        })
    }
}

impl<F, K> ForceImpl for KernelForceImpl<'_, F, K>
where
    K: KernelKind,
    K::Interface: ForceKernel<F>,
{
    fn force_name(&self) -> &'static str {
        self.name
    }

    fn kernel_names(&self) -> Vec<&'static str> {
        vec![K::NAME]
    }

    fn is_initialized(&self) -> bool {
        self.kernel.is_some()
    }

    fn initialize(&mut self, context: &ContextView<'_>) -> Result<(), Error> {
        if self.kernel.is_some() {
            return Err(Error::AlreadyInitialized {
                component: self.name,
            });
        }
        let mut kernel = context.platform().create_kernel::<K>(context)?;
        kernel.initialize(context.system(), self.owner)?;
        log::debug!("{} bound to kernel '{}'", self.name, K::NAME);
        self.kernel = Some(kernel);
        Ok(())
    }

    fn calc_forces(&self, context: &ContextView<'_>, forces: &mut [Vec3]) -> Result<(), Error> {
        let kernel = self.kernel()?;
        context.check_particle_counts()?;
        check_particle_count("forces", context.system().num_particles(), forces.len())?;
        kernel.execute_forces(context, forces)?;
        Ok(())
    }

    fn calc_energy(&self, context: &ContextView<'_>) -> Result<f64, Error> {
        let kernel = self.kernel()?;
        context.check_particle_counts()?;
        Ok(kernel.execute_energy(context)?)
    }
}

impl<F, K: KernelKind> fmt::Debug for KernelForceImpl<'_, F, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelForceImpl")
            .field("force", &self.name)
            .field("kernel", &K::NAME)
            .field("initialized", &self.kernel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextState;
    use crate::model::force::HarmonicAngleForce;
    use crate::model::system::System;
    use crate::platform::Platform;

    #[test]
    fn evaluation_before_initialize_is_rejected() {
        let force = HarmonicAngleForce::new();
        let imp = force.create_impl();

        let platform = Platform::reference();
        let system = System::new();
        let state = ContextState::new(0);
        let view = ContextView::new(&platform, &system, &state);

        assert!(matches!(
            imp.calc_energy(&view),
            Err(Error::NotInitialized {
                component: "HarmonicAngleForce"
            })
        ));
        assert!(matches!(
            imp.calc_forces(&view, &mut []),
            Err(Error::NotInitialized { .. })
        ));
    }

    #[test]
    fn failed_initialize_leaves_binding_uninitialised() {
        let force = HarmonicAngleForce::new();
        let mut imp = force.create_impl();

        let platform = Platform::builder("Empty").build();
        let system = System::new();
        let state = ContextState::new(0);
        let view = ContextView::new(&platform, &system, &state);

        assert!(matches!(
            imp.initialize(&view),
            Err(Error::KernelNotFound { .. })
        ));
        assert!(!imp.is_initialized());
        assert_eq!(imp.kernel_names(), vec!["CalcHarmonicAngleForceKernel"]);
    }

    #[test]
    fn initialize_binds_the_reference_kernel() {
        let force = HarmonicAngleForce::new();
        let mut imp = force.create_impl();
        assert!(std::ptr::eq(imp.owner(), &force));

        let platform = Platform::reference();
        let system = System::new();
        let state = ContextState::new(0);
        let view = ContextView::new(&platform, &system, &state);

        imp.initialize(&view).unwrap();
        assert!(imp.is_initialized());
        assert_eq!(imp.calc_energy(&view).unwrap(), 0.0);
        assert_eq!(imp.kernel_names(), vec!["CalcHarmonicAngleForceKernel"]);
    }
}
