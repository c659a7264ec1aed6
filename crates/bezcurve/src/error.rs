//! Error taxonomy for the curve engine and the sampler.

use thiserror::Error;

/// Errors produced by `bezcurve`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An anchor or handle index outside the current bounds of the store.
    ///
    /// This is a caller contract violation. Indices are never clamped.
    #[error("{entity} index {index} out of range (count {len})")]
    OutOfRange {
        /// What the index addressed ("anchor" or "handle").
        entity: &'static str,
        /// The offending index.
        index: usize,
        /// The number of entities at the time of the call.
        len: usize,
    },

    /// A curve mode name that the registry does not know.
    #[error("unknown curve mode '{0}'")]
    UnknownMode(String),

    /// Poisson-disk parameters that cannot produce a sampling.
    #[error("invalid sampling parameters: {0}")]
    InvalidSampling(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message() {
        let err = Error::OutOfRange {
            entity: "anchor",
            index: 3,
            len: 2,
        };
        assert_eq!(err.to_string(), "anchor index 3 out of range (count 2)");
    }
}
