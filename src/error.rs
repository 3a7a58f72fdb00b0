//! Error type shared by every kernel in the crate.

/// Everything that can go wrong before a parallel region starts.
///
/// The parallel phase itself never fails: once inputs are validated and
/// the output is allocated, workers only do arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatmulError {
    #[error("invalid dimension {rows}x{cols}: rows and columns must be positive")]
    InvalidDimension { rows: i64, cols: i64 },

    #[error("incompatible shapes: A has {left_cols} columns but B has {right_rows} rows")]
    IncompatibleShapes { left_cols: usize, right_rows: usize },

    #[error("unsupported thread count {requested}: expected 1..={max}")]
    UnsupportedThreadCount { requested: i64, max: usize },

    #[error("out of memory allocating a {rows}x{cols} matrix")]
    OutOfMemory { rows: usize, cols: usize },

    #[error("out of memory allocating a vector of {len} elements")]
    VectorOutOfMemory { len: usize },

    #[error("buffer of {len} elements does not fill a {rows}x{cols} matrix")]
    BufferLength { rows: usize, cols: usize, len: usize },

    #[error("vector length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("vector kernels need at least one element")]
    EmptyVector,
}

/// Convenience alias for `Result<T, MatmulError>`.
pub type Result<T> = std::result::Result<T, MatmulError>;
