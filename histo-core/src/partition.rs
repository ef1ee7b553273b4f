use std::ops::Range;

/// Index range of worker `id`'s slice when `len` elements are split across
/// `workers`. Every slice holds `len / workers` elements except the last,
/// which also takes the remainder.
pub fn slice_range(len: usize, workers: usize, id: usize) -> Range<usize> {
    debug_assert!(workers >= 1);
    debug_assert!(id < workers, "worker {id} out of {workers}");
    let chunk = len / workers;
    let start = id * chunk;
    if id + 1 < workers {
        start..start + chunk
    } else {
        start..len
    }
}

/// All slices in worker order; they tile `0..len` exactly.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    (0..workers).map(|id| slice_range(len, workers, id)).collect()
}
