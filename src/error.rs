//! Error types for mcboole-logic
//!
//! Problems with the data a caller hands in are reported as [`MinimizeError`].
//! Broken internal invariants (graph corruption, an impossible branch in the
//! solver) and allocator exhaustion are not recoverable: they go through
//! [`fatal!`](crate::fatal), which logs the context and panics.

use std::fmt;
use std::io;

pub use crate::format::error::{CubeFileError, CubeReadError, CubeWriteError};

/// Log an unrecoverable condition and abort the current minimization
#[macro_export]
#[doc(hidden)]
macro_rules! fatal {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        log::error!("fatal: {}", message);
        panic!("fatal: {}", message)
    }};
}

/// Errors caused by the data handed to the minimizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinimizeError {
    /// Two input cubes overlap while disjoint input cubes were required
    OverlappingCubes {
        /// The shared input part, printed as `0`/`1`/`-`
        inputs: String,
    },
    /// A cube does not match the dimensions of its cover
    DimensionMismatch {
        /// Inputs of the cover
        expected_inputs: usize,
        /// Inputs of the offending cube
        actual_inputs: usize,
        /// Outputs of the cover
        expected_outputs: usize,
        /// Outputs of the offending cube
        actual_outputs: usize,
    },
}

impl fmt::Display for MinimizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinimizeError::OverlappingCubes { inputs } => write!(
                f,
                "Input cubes overlap on {} but disjoint cubes are required",
                inputs
            ),
            MinimizeError::DimensionMismatch {
                expected_inputs,
                actual_inputs,
                expected_outputs,
                actual_outputs,
            } => write!(
                f,
                "Cube dimensions (inputs: {}, outputs: {}) don't match cover dimensions (inputs: {}, outputs: {})",
                actual_inputs, actual_outputs, expected_inputs, expected_outputs
            ),
        }
    }
}

impl std::error::Error for MinimizeError {}

impl From<MinimizeError> for io::Error {
    fn from(err: MinimizeError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}
