//! Batch boundaries and ordered parallel evaluation for scan candidates.

use rayon::prelude::*;

use crate::parallel::WorkerPool;

/// Split `total` items into at most `num_batches` contiguous `[start, end)` ranges.
/// Earlier batches take the remainder, so sizes differ by at most one.
///
/// # Example
/// ```
/// # use rinkplan::parallel::batch_ranges;
/// assert_eq!(batch_ranges(10, 3), vec![(0, 4), (4, 7), (7, 10)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let batches = num_batches.min(total);
    let (base, remainder) = (total / batches, total % batches);
    let mut start = 0;
    (0..batches)
        .map(|index| {
            let end = start + base + usize::from(index < remainder);
            let range = (start, end);
            start = end;
            range
        })
        .collect()
}

/// Evaluate `items` on `pool`, returning results in input order.
pub fn map_ordered<T, R, F>(pool: &WorkerPool, items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    pool.install(|| items.par_iter().map(|item| f(item)).collect())
}

/// Like [map_ordered] but in `num_batches` sequential batches, calling `on_progress(done, total)`
/// before the first batch and after each one.
pub fn map_ordered_with_progress<T, R, F, P>(
    pool: &WorkerPool,
    items: &[T],
    num_batches: usize,
    f: F,
    mut on_progress: P,
) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
    P: FnMut(usize, usize),
{
    let total = items.len();
    let mut results = Vec::with_capacity(total);
    if total == 0 {
        return results;
    }
    on_progress(0, total);
    for (start, end) in batch_ranges(total, num_batches) {
        results.extend(map_ordered(pool, &items[start..end], &f));
        on_progress(end, total);
    }
    results
}
