//! Element-wise vector kernels.
//!
//! [`add`] is a work-sharing loop over elements. [`add_and_multiply`]
//! runs two independent loops as separate sections.

use crate::error::{MatmulError, Result};
use crate::threaded::{Progress, Schedule, Section, Team, WorkerId};

/// `c[i] = a[i] + b[i]`, elements distributed over `team` by `schedule`.
///
/// With a dynamic schedule each worker claims `chunk` consecutive
/// elements at a time, so which worker handles which chunk changes from
/// run to run. The output does not.
pub fn add(
    a: &[f64],
    b: &[f64],
    team: &Team,
    schedule: Schedule,
    progress: &dyn Progress,
) -> Result<Vec<f64>> {
    check_lengths(a, b)?;
    let mut c = zeroed(a.len())?;

    team.for_each_row(&mut c, 1, schedule, |worker, i, out| {
        out[0] = a[i] + b[i];
        progress.completed(worker, i);
    });

    Ok(c)
}

/// Computes `c = a + b` and `d = a * b` as two sections.
///
/// Each section is a sequential loop run by one worker; with two or more
/// workers the sections run concurrently. Progress indices for `d` are
/// offset by `a.len()` so the two streams can be told apart.
pub fn add_and_multiply(
    a: &[f64],
    b: &[f64],
    team: &Team,
    progress: &dyn Progress,
) -> Result<(Vec<f64>, Vec<f64>)> {
    check_lengths(a, b)?;
    let mut c = zeroed(a.len())?;
    let mut d = zeroed(a.len())?;
    let offset = a.len();

    let sections: Vec<Section<'_, ()>> = vec![
        Box::new(|worker: WorkerId| {
            log::debug!("Thread {} doing section 1", worker);
            for (i, out) in c.iter_mut().enumerate() {
                *out = a[i] + b[i];
                progress.completed(worker, i);
            }
        }) as Section<'_, ()>,
        Box::new(|worker: WorkerId| {
            log::debug!("Thread {} doing section 2", worker);
            for (i, out) in d.iter_mut().enumerate() {
                *out = a[i] * b[i];
                progress.completed(worker, offset + i);
            }
        }) as Section<'_, ()>,
    ];
    team.sections(sections);

    Ok((c, d))
}

fn check_lengths(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(MatmulError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(MatmulError::EmptyVector);
    }
    Ok(())
}

fn zeroed(len: usize) -> Result<Vec<f64>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| MatmulError::VectorOutOfMemory { len })?;
    v.resize(len, 0.0);
    Ok(v)
}

/// Inputs of the chunk-distribution demo: `a[i] = b[i] = 2i`.
pub fn chunk_demo_inputs(len: usize) -> (Vec<f64>, Vec<f64>) {
    let a: Vec<f64> = (0..len).map(|i| i as f64 * 2.0).collect();
    (a.clone(), a)
}

/// Inputs of the sections demo: `a[i] = 1.5i`, `b[i] = i + 22.35`.
pub fn sections_demo_inputs(len: usize) -> (Vec<f64>, Vec<f64>) {
    let a = (0..len).map(|i| i as f64 * 1.5).collect();
    let b = (0..len).map(|i| i as f64 + 22.35).collect();
    (a, b)
}
