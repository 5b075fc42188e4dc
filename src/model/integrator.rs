//! Time integration algorithms.
//!
//! Like forces, an integrator is a plain description; its runtime binding
//! ([`Integrator::create_impl`]) resolves the step and kinetic energy kernels
//! from the platform.

use super::error::Error;
use crate::context::{IntegratorImpl, VerletIntegratorImpl};

/// Leapfrog Verlet integration with a fixed step size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerletIntegrator {
    step_size: f64,
}

impl VerletIntegrator {
    /// Creates an integrator with a step size in picoseconds.
    pub fn new(step_size: f64) -> Result<Self, Error> {
        validate_step_size(step_size)?;
        Ok(Self { step_size })
    }

    #[inline]
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn set_step_size(&mut self, step_size: f64) -> Result<(), Error> {
        validate_step_size(step_size)?;
        self.step_size = step_size;
        Ok(())
    }
}

fn validate_step_size(step_size: f64) -> Result<(), Error> {
    if step_size.is_finite() && step_size > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            "step size",
            format!("must be a positive finite time, got {step_size}"),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Integrator {
    Verlet(VerletIntegrator),
}

impl Integrator {
    pub fn name(&self) -> &'static str {
        match self {
            Integrator::Verlet(_) => "VerletIntegrator",
        }
    }

    #[inline]
    pub fn step_size(&self) -> f64 {
        match self {
            Integrator::Verlet(v) => v.step_size(),
        }
    }

    pub fn create_impl(&self) -> Box<dyn IntegratorImpl + '_> {
        match self {
            Integrator::Verlet(v) => Box::new(VerletIntegratorImpl::new(v)),
        }
    }
}

impl From<VerletIntegrator> for Integrator {
    fn from(integrator: VerletIntegrator) -> Self {
        Integrator::Verlet(integrator)
    }
}
