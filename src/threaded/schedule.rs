//! Loop scheduling policies.
//!
//! Both policies are plain functions of the iteration count so they can
//! be tested without spawning a single thread.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Chunk size used by the demo programs for dynamic scheduling.
pub const DEFAULT_CHUNK: NonZeroUsize = match NonZeroUsize::new(6) {
    Some(n) => n,
    None => unreachable!(),
};

/// How a loop's iteration space is divided among a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    /// One contiguous, roughly equal block per worker.
    #[default]
    Static,
    /// Workers repeatedly claim `chunk` consecutive iterations from a
    /// shared cursor until the range is exhausted.
    Dynamic { chunk: NonZeroUsize },
}

impl Schedule {
    /// Dynamic schedule with the given chunk size; `0` is bumped to `1`.
    pub fn dynamic(chunk: usize) -> Self {
        Schedule::Dynamic {
            chunk: NonZeroUsize::new(chunk).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Upper bound on the number of independent work units for `len`
    /// iterations. No more workers than this are ever spawned.
    pub fn work_units(&self, len: usize, team_size: usize) -> usize {
        match self {
            Schedule::Static => len.min(team_size),
            Schedule::Dynamic { chunk } => len.div_ceil(chunk.get()),
        }
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Schedule::Static => write!(f, "static"),
            Schedule::Dynamic { chunk } => write!(f, "dynamic({})", chunk),
        }
    }
}

/// Splits `0..len` into `workers` contiguous blocks.
///
/// Block sizes differ by at most one and the first `len % workers`
/// blocks get the extra iteration. Trailing blocks are empty when there
/// are more workers than iterations.
pub fn static_blocks(len: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let base = len / workers;
    let extra = len % workers;

    let mut start = 0;
    (0..workers)
        .map(|w| {
            let size = base + usize::from(w < extra);
            let block = start..start + size;
            start += size;
            block
        })
        .collect()
}

/// Shared cursor handing out chunks of `0..len` under dynamic scheduling.
///
/// Each successful [`claim`](Self::claim) returns a range no other caller
/// will ever see, so the holder may write the matching output exclusively.
#[derive(Debug)]
pub struct ChunkCursor {
    next: AtomicUsize,
    len: usize,
    chunk: usize,
}

impl ChunkCursor {
    pub fn new(len: usize, chunk: NonZeroUsize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            len,
            chunk: chunk.get(),
        }
    }

    /// Next unclaimed chunk, or `None` once the range is exhausted.
    pub fn claim(&self) -> Option<Range<usize>> {
        // Stop bumping once past the end so the counter cannot wrap.
        let start = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                (n < self.len).then(|| n.saturating_add(self.chunk))
            })
            .ok()?;
        Some(start..(start + self.chunk).min(self.len))
    }
}
