//! Fork-join thread team.
//!
//! A [`Team`] is only a size. Every operation forks scoped threads,
//! hands each one its share of the work, and joins them all before
//! returning. Nothing outlives the call.

use super::progress::WorkerId;
use super::schedule::{ChunkCursor, Schedule, static_blocks};
use crate::error::{MatmulError, Result};
use std::marker::PhantomData;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::{Mutex, PoisonError};
use std::thread;

/// Largest team [`Team::new`] accepts.
pub const MAX_TEAM_SIZE: usize = 1024;

/// An independent unit of work for [`Team::sections`].
pub type Section<'s, R> = Box<dyn FnOnce(WorkerId) -> R + Send + 's>;

/// A fixed number of workers for fork-join regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team {
    size: NonZeroUsize,
}

impl Team {
    /// Fails with [`MatmulError::UnsupportedThreadCount`] unless
    /// `1 <= threads <= MAX_TEAM_SIZE`.
    pub fn new(threads: usize) -> Result<Self> {
        Self::from_signed(i64::try_from(threads).unwrap_or(i64::MAX))
    }

    /// Same as [`Team::new`] for counts that arrive as signed integers.
    pub fn from_signed(threads: i64) -> Result<Self> {
        usize::try_from(threads)
            .ok()
            .filter(|&n| n <= MAX_TEAM_SIZE)
            .and_then(NonZeroUsize::new)
            .map(|size| Self { size })
            .ok_or(MatmulError::UnsupportedThreadCount {
                requested: threads,
                max: MAX_TEAM_SIZE,
            })
    }

    /// One worker per available core, falling back to a single worker.
    pub fn available() -> Self {
        let size = thread::available_parallelism()
            .map(|n| n.min(NonZeroUsize::new(MAX_TEAM_SIZE).unwrap_or(NonZeroUsize::MIN)))
            .unwrap_or(NonZeroUsize::MIN);
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size.get()
    }

    /// Parallel region: runs `f` once on every worker of the team.
    ///
    /// Results come back indexed by worker id.
    pub fn broadcast<R, F>(&self, f: F) -> Vec<R>
    where
        F: Fn(WorkerId) -> R + Sync,
        R: Send,
    {
        log::debug!("forking {} workers for a parallel region", self.size());
        if self.size() == 1 {
            return vec![f(WorkerId(0))];
        }

        let f = &f;
        thread::scope(|s| {
            let handles: Vec<_> = (0..self.size())
                .map(|tid| s.spawn(move || f(WorkerId(tid))))
                .collect();
            handles.into_iter().map(join).collect()
        })
    }

    /// Work-sharing loop over the rows of a row-major buffer.
    ///
    /// `data` is split into rows of `row_len` elements and every row is
    /// passed to `f` exactly once, together with its index and the id of
    /// the worker that owns it. A worker only ever sees the rows it was
    /// assigned, so no locking is needed.
    ///
    /// # Panics
    ///
    /// Panics if `row_len` is zero or does not divide `data.len()`, and
    /// re-raises any panic from `f` after all workers have stopped.
    pub fn for_each_row<T, F>(&self, data: &mut [T], row_len: usize, schedule: Schedule, f: F)
    where
        T: Send,
        F: Fn(WorkerId, usize, &mut [T]) + Sync,
    {
        assert!(row_len > 0, "row length must be positive");
        assert_eq!(
            data.len() % row_len,
            0,
            "buffer of {} elements is not a whole number of {}-element rows",
            data.len(),
            row_len
        );
        let rows = data.len() / row_len;
        let workers = schedule.work_units(rows, self.size()).min(self.size());
        log::debug!(
            "forking {} of {} workers over {} rows, schedule {}",
            workers,
            self.size(),
            rows,
            schedule
        );

        if workers <= 1 {
            for (i, row) in data.chunks_mut(row_len).enumerate() {
                f(WorkerId(0), i, row);
            }
            return;
        }

        match schedule {
            Schedule::Static => run_static(data, row_len, rows, workers, &f),
            Schedule::Dynamic { chunk } => {
                let cursor = ChunkCursor::new(rows, chunk);
                run_dynamic(data, row_len, workers, &cursor, &f)
            }
        }
    }

    /// Runs every section exactly once, spread over the team.
    ///
    /// Sections do not wait for each other; the call returns once all of
    /// them are done. Results are in section order, not completion order.
    pub fn sections<'s, R: Send>(&self, sections: Vec<Section<'s, R>>) -> Vec<R> {
        let count = sections.len();
        let workers = self.size().min(count);
        log::debug!("forking {} workers for {} sections", workers, count);

        if workers <= 1 {
            return sections.into_iter().map(|task| task(WorkerId(0))).collect();
        }

        let slots: Vec<Mutex<Option<Section<'s, R>>>> =
            sections.into_iter().map(|t| Mutex::new(Some(t))).collect();
        let cursor = ChunkCursor::new(count, NonZeroUsize::MIN);

        let mut done: Vec<(usize, R)> = thread::scope(|s| {
            let handles: Vec<_> = (0..workers)
                .map(|tid| {
                    let slots = &slots;
                    let cursor = &cursor;
                    s.spawn(move || {
                        let mut finished = Vec::new();
                        while let Some(claimed) = cursor.claim() {
                            let index = claimed.start;
                            let task = slots[index]
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .take();
                            if let Some(task) = task {
                                finished.push((index, task(WorkerId(tid))));
                            }
                        }
                        finished
                    })
                })
                .collect();
            handles.into_iter().flat_map(join).collect()
        });

        done.sort_unstable_by_key(|(index, _)| *index);
        done.into_iter().map(|(_, r)| r).collect()
    }
}

fn run_static<T, F>(data: &mut [T], row_len: usize, rows: usize, workers: usize, f: &F)
where
    T: Send,
    F: Fn(WorkerId, usize, &mut [T]) + Sync,
{
    thread::scope(|s| {
        let mut rest = data;
        let mut handles = Vec::with_capacity(workers);
        for (tid, block) in static_blocks(rows, workers).into_iter().enumerate() {
            let (mine, tail) = std::mem::take(&mut rest).split_at_mut(block.len() * row_len);
            rest = tail;
            handles.push(s.spawn(move || {
                for (offset, row) in mine.chunks_mut(row_len).enumerate() {
                    f(WorkerId(tid), block.start + offset, row);
                }
            }));
        }
        handles.into_iter().for_each(join);
    });
}

fn run_dynamic<T, F>(data: &mut [T], row_len: usize, workers: usize, cursor: &ChunkCursor, f: &F)
where
    T: Send,
    F: Fn(WorkerId, usize, &mut [T]) + Sync,
{
    let rows = RowPtr::new(data, row_len);
    let rows = &rows;
    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|tid| {
                s.spawn(move || {
                    while let Some(claimed) = cursor.claim() {
                        let start = claimed.start;
                        // SAFETY: the cursor never hands out the same row twice.
                        let block = unsafe { rows.block_mut(claimed) };
                        for (offset, row) in block.chunks_mut(row_len).enumerate() {
                            f(WorkerId(tid), start + offset, row);
                        }
                    }
                })
            })
            .collect();
        handles.into_iter().for_each(join);
    });
}

/// Raw view of a row-major buffer that workers carve disjoint row blocks
/// out of.
struct RowPtr<'a, T> {
    ptr: *mut T,
    row_len: usize,
    rows: usize,
    _borrow: PhantomData<&'a mut [T]>,
}

// Workers only touch disjoint rows, so sharing the pointer is sound as
// long as the elements themselves may move between threads.
unsafe impl<T: Send> Sync for RowPtr<'_, T> {}
unsafe impl<T: Send> Send for RowPtr<'_, T> {}

impl<'a, T> RowPtr<'a, T> {
    fn new(data: &'a mut [T], row_len: usize) -> Self {
        Self {
            ptr: data.as_mut_ptr(),
            row_len,
            rows: data.len() / row_len,
            _borrow: PhantomData,
        }
    }

    /// # Safety
    ///
    /// No two live slices returned by this method may overlap.
    #[allow(clippy::mut_from_ref)]
    unsafe fn block_mut(&self, rows: Range<usize>) -> &mut [T] {
        assert!(rows.start <= rows.end && rows.end <= self.rows);
        unsafe {
            std::slice::from_raw_parts_mut(
                self.ptr.add(rows.start * self.row_len),
                rows.len() * self.row_len,
            )
        }
    }
}

fn join<R>(handle: thread::ScopedJoinHandle<'_, R>) -> R {
    handle
        .join()
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
}
