use super::{check_preconditions, Solver};
use crate::binning::{bin_limits, bin_slice};
use crate::bins::Bins;
use crate::partition::slice_range;
use crate::rendezvous::Rendezvous;
use crate::topology::{receive_list, send_target};
use histo_common::{Fp, HistoError, Result, RunConfig};
use std::thread;

/// Partition and bin like [`Parallel`](super::Parallel), but merge through a
/// recursive-doubling tree: each pair of workers meets at a [`Rendezvous`],
/// and worker 0 ends up holding the result after `ceil(log2(W))` rounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tree;

impl Solver for Tree {
    fn name(&self) -> &'static str {
        "TreeStructuredSum"
    }

    fn solve(&self, config: &RunConfig, dataset: &[Fp]) -> Result<Bins> {
        check_preconditions(config, dataset);
        let workers = config.threads;
        let _span = tracing::debug_span!("solve", solver = self.name(), workers, size = dataset.len()).entered();
        let limits = bin_limits(config.bins, config.min, config.max);
        reduce_tree(workers, |id| bin_slice(&dataset[slice_range(dataset.len(), workers, id)], &limits))
    }
}

/// Abandons a worker's hand-offs unless disarmed, so a worker that panics or
/// loses a peer releases everyone waiting on it instead of leaving them blocked.
struct Abandon<'a> {
    channels: &'a [Rendezvous<Bins>],
    own: usize,
    peers: &'a [usize],
    armed: bool,
}

impl Drop for Abandon<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.channels[self.own].abandon();
            for &peer in self.peers {
                self.channels[peer].abandon();
            }
        }
    }
}

/// Runs `local` on `workers` threads and folds the partials through the
/// reduction tree. A panicking or unspawnable worker turns into an error.
fn reduce_tree<F>(workers: usize, local: F) -> Result<Bins>
where
    F: Fn(usize) -> Bins + Sync,
{
    // channel `i` carries worker i's partial to whoever it sends to
    let channels: Vec<Rendezvous<Bins>> = (0..workers).map(|_| Rendezvous::new()).collect();
    let channels = channels.as_slice();
    let local = &local;

    let worker = move |id: usize| -> Result<Option<Bins>> {
        let peers = receive_list(workers, id);
        let mut guard = Abandon { channels, own: id, peers: &peers, armed: true };
        let mut bins = local(id);
        for &peer in &peers {
            let partial = channels[peer]
                .recv()
                .ok_or_else(|| HistoError::Other(format!("tree worker {peer} stopped before handing off")))?;
            tracing::trace!(worker = id, from = peer, "merged partial");
            bins.merge(&partial);
        }
        guard.armed = false;
        drop(guard);
        match send_target(workers, id) {
            Some(to) => {
                tracing::trace!(worker = id, to = to.peer, distance = to.distance, "handing off");
                channels[id].send(bins);
                Ok(None)
            }
            None => Ok(Some(bins)),
        }
    };

    thread::scope(|s| {
        let mut handles = Vec::with_capacity(workers);
        let mut spawn_error = None;
        for id in 0..workers {
            let spawned = thread::Builder::new()
                .name(format!("histo-tree-{id}"))
                .spawn_scoped(s, move || worker(id));
            match spawned {
                Ok(handle) => handles.push((id, handle)),
                Err(e) => {
                    // started workers may be waiting on peers that will never exist
                    for channel in channels {
                        channel.abandon();
                    }
                    spawn_error = Some(HistoError::Other(format!("failed to spawn tree worker {id}: {e}")));
                    break;
                }
            }
        }

        let mut root = None;
        let mut panicked = None;
        let mut failed = None;
        for (id, handle) in handles {
            match handle.join() {
                Err(_) => {
                    panicked.get_or_insert_with(|| HistoError::Other(format!("tree worker {id} panicked")));
                }
                Ok(Err(e)) => {
                    failed.get_or_insert(e);
                }
                Ok(Ok(Some(bins))) => root = Some(bins),
                Ok(Ok(None)) => {}
            }
        }
        if let Some(e) = spawn_error.or(panicked).or(failed) {
            return Err(e);
        }
        root.ok_or_else(|| HistoError::Other("root worker returned no result".into()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::Serial;

    #[test]
    fn scenario_four_workers() {
        let data = [0.5, 1.5, 2.5, 3.5, 4.5, 5.0];
        let config = RunConfig::new(4, 5, 0.0, 5.0, data.len()).unwrap();
        let bins = Tree.solve(&config, &data).unwrap();
        assert_eq!(bins.counts, vec![1, 1, 1, 1, 2]);
        assert_eq!(bins.maxes, vec![0.5, 1.5, 2.5, 3.5, 5.0]);
    }

    #[test]
    fn single_worker() {
        let data = [0.2, 0.4];
        let config = RunConfig::new(1, 2, 0.0, 1.0, data.len()).unwrap();
        assert_eq!(Tree.solve(&config, &data).unwrap().counts, vec![2, 0]);
    }

    #[test]
    fn uneven_workers_match_serial() {
        let data: Vec<f64> = (0..503).map(|i| ((i * 37) % 101) as f64 / 20.0).collect();
        let serial_config = RunConfig::new(1, 6, 0.0, 5.0, data.len()).unwrap();
        let expected = Serial.solve(&serial_config, &data).unwrap();
        for workers in [2, 3, 5, 6, 7, 9, 13] {
            let config = serial_config.with_threads(workers).unwrap();
            let got = Tree.solve(&config, &data).unwrap();
            assert!(got.bitwise_eq(&expected), "workers={workers}");
        }
    }

    #[test]
    fn more_workers_than_values() {
        let data = [4.0];
        let config = RunConfig::new(16, 5, 0.0, 5.0, 1).unwrap();
        let bins = Tree.solve(&config, &data).unwrap();
        assert_eq!(bins.counts, vec![0, 0, 0, 1, 0]);
        assert_eq!(bins.max_of(3), Some(4.0));
    }

    #[test]
    fn panicking_worker_is_an_error() {
        for failing in [0, 1, 4, 5, 7] {
            let result = reduce_tree(8, |id| {
                if id == failing {
                    panic!("worker {id} failed");
                }
                Bins::new(2)
            });
            match result {
                Err(HistoError::Other(msg)) => assert_eq!(msg, format!("tree worker {failing} panicked")),
                other => panic!("expected panic error for worker {failing}, got {other:?}"),
            }
        }
    }

    #[test]
    fn reduce_tree_merges_every_partial() {
        for workers in [1, 2, 3, 8, 11] {
            let bins = reduce_tree(workers, |id| {
                let mut b = Bins::new(1);
                b.record(0, id as f64);
                b
            })
            .unwrap();
            assert_eq!(bins.counts, vec![workers as u64]);
            assert_eq!(bins.maxes, vec![(workers - 1) as f64]);
        }
    }
}
