//! Kernel interfaces and the typed handles that own them.
//!
//! Every computational operation has a canonical name and an interface
//! trait. A platform's factory returns implementations wrapped in the
//! capability-tagged [`KernelImpl`] enum; [`Platform::create_kernel`] unwraps
//! the variant once, at construction, into a [`Kernel<K>`] whose interface is
//! fixed by the kernel kind `K`. Code holding a `Kernel<K>` calls the
//! interface directly.
//!
//! [`Platform::create_kernel`]: super::Platform::create_kernel

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::context::{ContextState, ContextView};
use crate::model::force::{
    HarmonicAngleForce, HarmonicBondForce, NonbondedForce, PeriodicTorsionForce,
};
use crate::model::integrator::VerletIntegrator;
use crate::model::system::System;
use crate::model::vec3::Vec3;

/// Opaque error raised inside a kernel implementation.
///
/// The dispatch layer never inspects it; it reaches the caller unchanged
/// through [`Error::Kernel`](super::Error::Kernel).
pub type KernelError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Evaluation of one force term.
pub trait ForceKernel<F: ?Sized>: Send {
    /// Copies whatever the kernel needs from the system and the force.
    fn initialize(&mut self, system: &System, force: &F) -> Result<(), KernelError>;

    /// Adds this term's forces to `forces`; must not overwrite other
    /// contributions.
    fn execute_forces(
        &self,
        context: &ContextView<'_>,
        forces: &mut [Vec3],
    ) -> Result<(), KernelError>;

    /// Returns this term's potential energy in kJ/mol.
    fn execute_energy(&self, context: &ContextView<'_>) -> Result<f64, KernelError>;
}

/// One integration step.
pub trait IntegratorKernel<I: ?Sized>: Send {
    fn initialize(&mut self, system: &System, integrator: &I) -> Result<(), KernelError>;

    /// Advances positions and velocities in `state` by one step using the
    /// total `forces` evaluated at the current positions.
    fn execute(
        &mut self,
        system: &System,
        integrator: &I,
        state: &mut ContextState,
        forces: &[Vec3],
    ) -> Result<(), KernelError>;
}

pub trait KineticEnergyKernel: Send {
    fn initialize(&mut self, system: &System) -> Result<(), KernelError>;

    fn execute(&self, context: &ContextView<'_>) -> Result<f64, KernelError>;
}

/// Associates a kernel name with the interface implementations of that
/// kernel must provide.
pub trait KernelKind: 'static {
    /// Canonical kernel name, unique across the crate.
    const NAME: &'static str;

    type Interface: ?Sized + Send;

    fn into_impl(kernel: Box<Self::Interface>) -> KernelImpl;

    /// Returns the implementation if `kernel` is of this kind, or gives the
    /// kernel back unchanged.
    fn from_impl(kernel: KernelImpl) -> Result<Box<Self::Interface>, KernelImpl>;
}

macro_rules! kernel_kinds {
    ($($(#[$doc:meta])* $kind:ident($iface:ty) => $name:literal;)+) => {
        /// A kernel implementation tagged with the interface it provides.
        pub enum KernelImpl {
            $($(#[$doc])* $kind(Box<$iface>),)+
        }

        impl KernelImpl {
            /// Name of the kernel interface this implementation provides.
            pub fn name(&self) -> &'static str {
                match self {
                    $(KernelImpl::$kind(_) => $name,)+
                }
            }
        }

        /// Every kernel name defined by this crate.
        pub const KERNEL_NAMES: &[&str] = &[$($name),+];

        /// Marker types selecting a kernel interface in
        /// [`Platform::create_kernel`](super::super::Platform::create_kernel).
        pub mod kind {
            use super::*;

            $(
                $(#[$doc])*
                #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
                pub struct $kind;

                impl KernelKind for $kind {
                    const NAME: &'static str = $name;
                    type Interface = $iface;

                    fn into_impl(kernel: Box<Self::Interface>) -> KernelImpl {
                        KernelImpl::$kind(kernel)
                    }

                    fn from_impl(kernel: KernelImpl) -> Result<Box<Self::Interface>, KernelImpl> {
                        match kernel {
                            KernelImpl::$kind(k) => Ok(k),
                            other => Err(other),
                        }
                    }
                }
            )+
        }
    };
}

kernel_kinds! {
    /// Harmonic bond forces and energy.
    CalcHarmonicBondForce(dyn ForceKernel<HarmonicBondForce>) => "CalcHarmonicBondForceKernel";
    /// Harmonic angle forces and energy.
    CalcHarmonicAngleForce(dyn ForceKernel<HarmonicAngleForce>) => "CalcHarmonicAngleForceKernel";
    /// Periodic torsion forces and energy.
    CalcPeriodicTorsionForce(dyn ForceKernel<PeriodicTorsionForce>)
        => "CalcPeriodicTorsionForceKernel";
    /// Coulomb and Lennard-Jones forces and energy.
    CalcNonbondedForce(dyn ForceKernel<NonbondedForce>) => "CalcNonbondedForceKernel";
    /// One leapfrog Verlet step.
    IntegrateVerletStep(dyn IntegratorKernel<VerletIntegrator>) => "IntegrateVerletStepKernel";
    /// Total kinetic energy.
    CalcKineticEnergy(dyn KineticEnergyKernel) => "CalcKineticEnergyKernel";
}

impl fmt::Debug for KernelImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KernelImpl").field(&self.name()).finish()
    }
}

/// Owning handle to a kernel implementation of kind `K`.
///
/// Dereferences to `K`'s interface.
pub struct Kernel<K: KernelKind> {
    inner: Box<K::Interface>,
}

impl<K: KernelKind> Kernel<K> {
    pub fn new(inner: Box<K::Interface>) -> Self {
        Self { inner }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        K::NAME
    }

    /// Gives up the typed view, returning the tagged implementation.
    pub fn into_impl(self) -> KernelImpl {
        K::into_impl(self.inner)
    }
}

impl<K: KernelKind> Deref for Kernel<K> {
    type Target = K::Interface;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<K: KernelKind> DerefMut for Kernel<K> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<K: KernelKind> fmt::Debug for Kernel<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Kernel").field(&K::NAME).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullKinetic;

    impl KineticEnergyKernel for NullKinetic {
        fn initialize(&mut self, _system: &System) -> Result<(), KernelError> {
            Ok(())
        }

        fn execute(&self, _context: &ContextView<'_>) -> Result<f64, KernelError> {
            Ok(0.0)
        }
    }

    #[test]
    fn kernel_names_are_unique() {
        let mut names = KERNEL_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), KERNEL_NAMES.len());
    }

    #[test]
    fn kind_round_trips_its_own_variant() {
        let tagged = kind::CalcKineticEnergy::into_impl(Box::new(NullKinetic));
        assert_eq!(tagged.name(), "CalcKineticEnergyKernel");

        let kernel = Kernel::<kind::CalcKineticEnergy>::new(
            kind::CalcKineticEnergy::from_impl(tagged).unwrap(),
        );
        assert_eq!(kernel.name(), "CalcKineticEnergyKernel");
        assert_eq!(kernel.into_impl().name(), "CalcKineticEnergyKernel");
    }

    #[test]
    fn kind_rejects_other_variants() {
        let tagged = KernelImpl::CalcKineticEnergy(Box::new(NullKinetic));
        let Err(back) = kind::CalcHarmonicBondForce::from_impl(tagged) else {
            panic!("kinetic energy kernel accepted as a bond kernel");
        };
        assert_eq!(back.name(), "CalcKineticEnergyKernel");
    }
}
