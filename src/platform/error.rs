//! Error type for kernel dispatch and context evaluation.
//!
//! Failures are grouped by where they arise: kernel resolution on a
//! platform, misuse of an uninitialised binding, errors raised inside a
//! kernel implementation, stream transfers, and invalid model parameters.

use thiserror::Error;

use super::kernel::KernelError;
use crate::model::error::Error as ConfigurationError;

/// Errors raised while building or evaluating a simulation context.
#[derive(Debug, Error)]
pub enum Error {
    /// No factory is registered for a kernel name on the platform.
    ///
    /// Indicates a missing or misconfigured backend; retrying will not help.
    #[error("no kernel factory registered for '{name}' on platform '{platform}'")]
    KernelNotFound {
        /// The requested kernel name.
        name: String,
        /// Name of the platform that was asked.
        platform: String,
    },

    /// A factory returned an implementation of a different kernel interface
    /// than the name it was registered under.
    #[error("kernel factory for '{name}' produced a '{found}' kernel")]
    KernelMismatch {
        /// The requested kernel name.
        name: String,
        /// Name of the interface the factory actually produced.
        found: &'static str,
    },

    /// A force or integrator binding was evaluated before `initialize`.
    #[error("{component} was used before it was initialized")]
    NotInitialized {
        /// Name of the force or integrator.
        component: &'static str,
    },

    /// `initialize` was called on a binding that already holds its kernels.
    #[error("{component} is already initialized")]
    AlreadyInitialized {
        /// Name of the force or integrator.
        component: &'static str,
    },

    /// Error raised inside a kernel implementation, passed through unchanged.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// A stream transfer did not match the stream's shape.
    #[error("stream '{name}': {detail}")]
    Stream {
        /// Stream name.
        name: String,
        /// Description of the problem.
        detail: String,
    },

    /// Per-particle data does not match the number of particles in the system.
    #[error("expected {expected} {what}, one per particle, but got {found}")]
    ParticleCountMismatch {
        /// What was supplied (e.g. "positions").
        what: &'static str,
        /// Number of particles in the system.
        expected: usize,
        /// Number of entries supplied.
        found: usize,
    },

    /// Invalid declarative parameters.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl Error {
    /// Creates a [`KernelNotFound`](Error::KernelNotFound) error.
    pub fn kernel_not_found(name: impl Into<String>, platform: impl Into<String>) -> Self {
        Self::KernelNotFound {
            name: name.into(),
            platform: platform.into(),
        }
    }

    /// Creates a [`Stream`](Error::Stream) error.
    pub fn stream(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Stream {
            name: name.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("matrix is singular")]
    struct Singular;

    #[test]
    fn kernel_errors_keep_their_message() {
        let err: Error = KernelError::from(Singular).into();
        assert_eq!(err.to_string(), "matrix is singular");
        match err {
            Error::Kernel(inner) => assert!(inner.downcast_ref::<Singular>().is_some()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn kernel_not_found_message() {
        let err = Error::kernel_not_found("CalcFooKernel", "Reference");
        assert_eq!(
            err.to_string(),
            "no kernel factory registered for 'CalcFooKernel' on platform 'Reference'"
        );
    }
}
