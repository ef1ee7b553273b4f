//! Static shape of the recursive-doubling reduction tree.
//!
//! Rounds run at distances `1, 2, 4, ...` while the distance is below the
//! worker count. In the round at distance `d`, a worker whose id is a
//! multiple of `2d` takes the partial result of worker `id + d` (when that
//! worker exists), and a worker that is a multiple of `d` but not of `2d`
//! hands its partial result to `id - d` and leaves the tree.
//!
//! ```text
//! workers: 0  1  2  3  4  5  6  7
//! d = 1    +--+  +--+  +--+  +--+
//! d = 2    +-----+     +-----+
//! d = 4    +-----------+
//! ```

/// A worker's single hand-off: target peer and the round distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendTo {
    pub peer: usize,
    pub distance: usize,
}

/// Round distances for `workers` participants, ascending.
pub fn distances(workers: usize) -> impl Iterator<Item = usize> {
    std::iter::successors(Some(1usize), |d| d.checked_mul(2)).take_while(move |&d| d < workers)
}

/// Number of rounds, `ceil(log2(workers))`.
pub fn rounds(workers: usize) -> usize {
    distances(workers).count()
}

/// Lowest set bit of `id`; the distance at which a non-root worker sends.
fn send_distance(id: usize) -> usize {
    id & id.wrapping_neg()
}

/// Peers worker `id` receives from, in round order.
pub fn receive_list(workers: usize, id: usize) -> Vec<usize> {
    debug_assert!(id < workers, "worker {id} out of {workers}");
    let leaves_at = if id == 0 { usize::MAX } else { send_distance(id) };
    distances(workers)
        .take_while(|&d| d < leaves_at && id + d < workers)
        .map(|d| id + d)
        .collect()
}

pub fn num_receives(workers: usize, id: usize) -> usize {
    receive_list(workers, id).len()
}

/// `None` for the root, which keeps the final result.
pub fn send_target(workers: usize, id: usize) -> Option<SendTo> {
    debug_assert!(id < workers, "worker {id} out of {workers}");
    if id == 0 {
        return None;
    }
    let distance = send_distance(id);
    Some(SendTo { peer: id - distance, distance })
}
