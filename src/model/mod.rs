//! Declarative description of a simulation.
//!
//! - [`vec3`] – Cartesian vectors and the [`Axis`](vec3::Axis) enum.
//! - [`system`] – Particles (masses) and the forces acting on them.
//! - [`force`] – Parameter storage for every supported potential term.
//! - [`integrator`] – Time integration algorithms.
//! - [`error`] – Validation errors raised by the setters above.
//!
//! Nothing in this module evaluates energies: the model is turned into
//! runtime bindings by a [`SimulationContext`](crate::SimulationContext),
//! which resolves the matching kernels from a [`Platform`](crate::Platform).

pub mod error;
pub mod force;
pub mod integrator;
pub mod system;
pub mod vec3;
