use thiserror::Error;

/// Rejections raised by the reference kernels while initialising.
///
/// They reach callers wrapped in [`platform::Error::Kernel`](crate::platform::Error::Kernel)
/// and can be recovered with `downcast_ref::<KernelError>()`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    #[error(
        "{term} {index} refers to particle {particle}, but the system has {num_particles} particles"
    )]
    ParticleOutOfRange {
        /// Kind of term, e.g. "bond" or "torsion".
        term: &'static str,
        /// Index of the term within its force.
        index: usize,
        particle: usize,
        num_particles: usize,
    },

    #[error("NonbondedForce has {found} particle records, but the system has {expected} particles")]
    AtomCountMismatch { expected: usize, found: usize },

    #[error(
        "cutoff distance {cutoff} nm exceeds half the shortest periodic box edge ({half_box} nm)"
    )]
    CutoffTooLarge { cutoff: f64, half_box: f64 },

    #[error("particle {index} has negative mass {mass}")]
    NegativeMass { index: usize, mass: f64 },
}

/// Checks that every particle index of term `index` exists in the system.
pub(super) fn check_particles(
    term: &'static str,
    index: usize,
    particles: &[usize],
    num_particles: usize,
) -> Result<(), KernelError> {
    match particles.iter().find(|&&p| p >= num_particles) {
        Some(&particle) => Err(KernelError::ParticleOutOfRange {
            term,
            index,
            particle,
            num_particles,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_first_offending_particle() {
        let err = check_particles("angle", 3, &[0, 7, 9], 5).unwrap_err();
        assert_eq!(
            err,
            KernelError::ParticleOutOfRange {
                term: "angle",
                index: 3,
                particle: 7,
                num_particles: 5
            }
        );
        assert_eq!(
            err.to_string(),
            "angle 3 refers to particle 7, but the system has 5 particles"
        );
    }

    #[test]
    fn accepts_indices_in_range() {
        assert!(check_particles("bond", 0, &[0, 4], 5).is_ok());
    }
}
