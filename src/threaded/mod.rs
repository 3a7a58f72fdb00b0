//! Fork-join parallelism.
//!
//! A [`Team`] forks scoped worker threads for one call and joins them
//! before returning. How a loop's iterations are divided is a
//! [`Schedule`]: contiguous static blocks, or fixed-size chunks pulled
//! from a shared atomic cursor.
//!
//! Available kernels:
//! - `gemm_rows_mt`: row-partitioned matrix multiplication

pub mod gemm_rows_mt;
pub mod progress;
pub mod schedule;
pub mod team;

pub use progress::{LogProgress, Progress, WorkerId};
pub use schedule::{ChunkCursor, DEFAULT_CHUNK, Schedule};
pub use team::{MAX_TEAM_SIZE, Section, Team};
