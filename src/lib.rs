//! Platform and kernel dispatch for molecular dynamics force and integrator evaluation.
//! Forces are plain parameter containers; every evaluation is delegated to a computational
//! kernel that a pluggable platform resolves by name when a simulation context is built.
//!
//! # Features
//!
//! - **Typed kernel dispatch** – Platforms map kernel names to factories and hand back
//!   kernels typed by their interface, so bindings never downcast
//! - **Immutable platforms** – Factories are registered through [`PlatformBuilder`]; a built
//!   [`Platform`] is shared between contexts through an `Arc`
//! - **Force definitions** – Harmonic bonds, harmonic angles, periodic torsions, and
//!   Coulomb/Lennard-Jones nonbonded terms with cutoff and periodic boxes
//! - **Reference platform** – Portable double precision CPU kernels for every force and for
//!   leapfrog Verlet integration
//!
//! # Quick Start
//!
//! Build a [`System`], add forces, and evaluate it in a [`SimulationContext`]:
//!
//! ```
//! use std::sync::Arc;
//! use mdkernel::{
//!     Error, HarmonicAngleForce, HarmonicBondForce, Integrator, Platform, SimulationContext,
//!     System, VerletIntegrator,
//! };
//!
//! // A flexible water molecule
//! let mut system = System::new();
//! let o = system.add_particle(15.999);
//! let h1 = system.add_particle(1.008);
//! let h2 = system.add_particle(1.008);
//!
//! let mut bonds = HarmonicBondForce::new();
//! bonds.add_bond(o, h1, 0.09572, 462_750.4);
//! bonds.add_bond(o, h2, 0.09572, 462_750.4);
//! system.add_force(bonds);
//!
//! let mut angles = HarmonicAngleForce::new();
//! angles.add_angle(h1, o, h2, 104.52_f64.to_radians(), 836.8);
//! system.add_force(angles);
//!
//! let integrator: Integrator = VerletIntegrator::new(0.0005)?.into();
//! let platform = Arc::new(Platform::reference());
//! let mut context = SimulationContext::new(&system, &integrator, platform)?;
//!
//! let theta = 104.52_f64.to_radians();
//! context.set_positions(&[
//!     [0.0, 0.0, 0.0],
//!     [0.09572, 0.0, 0.0],
//!     [0.09572 * theta.cos(), 0.09572 * theta.sin(), 0.0],
//! ])?;
//!
//! // At the equilibrium geometry there is no strain energy
//! assert!(context.calc_potential_energy()?.abs() < 1e-9);
//!
//! context.step(10)?;
//! assert!((context.time() - 0.005).abs() < 1e-12);
//! # Ok::<(), Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`platform`] – Platforms, kernel interfaces, factories, registries and streams
//! - [`platform::reference`] – The CPU reference platform
//! - [`context`] – Simulation contexts and the force/integrator bindings they own
//!
//! # Data Types
//!
//! ## Model
//!
//! - [`System`] – Particle masses and the forces acting on them
//! - [`Force`] – Closed set of force variants
//! - [`HarmonicBondForce`], [`HarmonicAngleForce`], [`PeriodicTorsionForce`],
//!   [`NonbondedForce`] – Force parameter storage
//! - [`Integrator`], [`VerletIntegrator`] – Time integration
//!
//! ## Dispatch
//!
//! - [`Platform`] – Kernel registry and capability queries
//! - [`KernelFactory`] – Constructs kernel implementations by name
//! - [`Kernel`] – Owning handle typed by kernel kind
//! - [`ForceImpl`], [`IntegratorImpl`] – Runtime bindings created by a context
//!
//! ## Errors
//!
//! - [`Error`] – Dispatch and evaluation failures
//! - [`ConfigurationError`] – Rejected model parameters

mod model;

pub mod context;
pub mod platform;

pub use model::force::{
    AngleParams, AtomParams, BondParams, Force, HarmonicAngleForce, HarmonicBondForce,
    Nonbonded14Params, NonbondedForce, NonbondedMethod, PeriodicTorsionForce, TorsionParams,
};
pub use model::integrator::{Integrator, VerletIntegrator};
pub use model::system::System;
pub use model::vec3::{Axis, Vec3};

pub use context::{
    ContextState, ContextView, ForceImpl, IntegratorImpl, SimulationContext, State,
};
pub use platform::{
    DataType, Kernel, KernelFactory, KernelImpl, KernelKind, Platform, PlatformBuilder, Stream,
};

pub use model::error::Error as ConfigurationError;
pub use platform::Error;
