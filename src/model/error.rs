//! Validation errors raised by the declarative model types.
//!
//! Every setter that can fail validates its input before touching any state,
//! so an `Err` always leaves the receiver exactly as it was and the caller
//! can retry the same call with corrected values.

use super::vec3::{Axis, Vec3};
use thiserror::Error;

/// Invalid declarative parameters supplied to a force, system or integrator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A periodic box vector has a nonzero off-axis component.
    #[error(
        "{} periodic box vector must be parallel to {}, got {vector:?}",
        .axis.ordinal(),
        .axis
    )]
    NonAxisAlignedBoxVector {
        /// Axis the offending vector must be parallel to.
        axis: Axis,
        /// The rejected vector.
        vector: Vec3,
    },

    /// An index accessor was called with an index past the end of its list.
    #[error("{kind} index {index} is out of range (length {len})")]
    IndexOutOfRange {
        /// What the index addresses (e.g. "particle", "bond").
        kind: &'static str,
        /// The rejected index.
        index: usize,
        /// Current length of the addressed list.
        len: usize,
    },

    /// A scalar setting is outside the range the simulation can use.
    #[error("invalid {name}: {detail}")]
    InvalidParameter {
        /// Name of the setting.
        name: &'static str,
        /// Description of the problem.
        detail: String,
    },
}

impl Error {
    /// Creates an [`InvalidParameter`](Error::InvalidParameter) error.
    pub fn invalid_parameter(name: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            detail: detail.into(),
        }
    }
}

/// Returns `index` if it addresses an element of a list of length `len`.
pub(crate) fn check_index(kind: &'static str, index: usize, len: usize) -> Result<usize, Error> {
    if index < len {
        Ok(index)
    } else {
        Err(Error::IndexOutOfRange { kind, index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_vector_message_names_the_axis() {
        let err = Error::NonAxisAlignedBoxVector {
            axis: Axis::Y,
            vector: [0.1, 2.0, 0.0],
        };
        assert_eq!(
            err.to_string(),
            "second periodic box vector must be parallel to y, got [0.1, 2.0, 0.0]"
        );
    }

    #[test]
    fn check_index_bounds() {
        assert_eq!(check_index("particle", 2, 3), Ok(2));
        assert_eq!(
            check_index("particle", 3, 3),
            Err(Error::IndexOutOfRange {
                kind: "particle",
                index: 3,
                len: 3
            })
        );
    }
}
