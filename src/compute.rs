// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A small data-parallel dispatcher.
//!
//! Every kernel in this crate is a plain function of an index (or of
//! an index and a slice it exclusively owns).  The `Accelerator`
//! spreads those indices across a fixed pool of scoped threads and
//! does not return until every lane is done, so each dispatch is a
//! full barrier with respect to the next one.  A kernel that panics
//! comes back as `Error::LaneFailure`, whether it ran on a pool of
//! lanes or inline on the caller's thread.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use log::trace;

use crate::errors::{Error, Result};

/// Consecutive indices a lane claims from the shared counter at a time.
const GRAIN: usize = 256;

/// Where a buffer lives.  Histograms and sample batches are
/// `Device` buffers that only kernels touch; anything a caller reads
/// directly has been copied back to a `Host` buffer first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// Written and read by kernels dispatched on an `Accelerator`.
    Device,
    /// Plain memory owned by the caller.
    Host,
}

/// Handle to the compute device.  Built once at startup and passed
/// by reference to everything that dispatches work.
#[derive(Clone, Debug)]
pub struct Accelerator {
    lanes: usize,
}

impl Default for Accelerator {
    fn default() -> Self {
        Accelerator::new(num_cpus::get())
    }
}

impl Accelerator {
    /// An accelerator with the given number of lanes.  Zero is
    /// treated as one.
    pub fn new(lanes: usize) -> Self {
        Accelerator {
            lanes: lanes.max(1),
        }
    }

    /// Number of lanes work is spread across.
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    /// Run `kernel(i)` for every `i` in `0..extent`.  Lanes claim
    /// blocks of indices from a shared counter, so no index runs
    /// twice and the order between indices is unspecified.
    pub fn parallel_for<F>(&self, name: &'static str, extent: usize, kernel: F) -> Result<()>
    where
        F: Fn(usize) + Sync,
    {
        trace!("dispatch {} over {} indices", name, extent);
        let lanes = self.lanes.min((extent + GRAIN - 1) / GRAIN);
        if lanes <= 1 {
            return inline(name, || (0..extent).for_each(&kernel));
        }

        let next = AtomicUsize::new(0);
        let (next, kernel) = (&next, &kernel);
        crossbeam::scope(|spawner| {
            for _ in 0..lanes {
                spawner.spawn(move |_| loop {
                    let start = next.fetch_add(GRAIN, Ordering::Relaxed);
                    if start >= extent {
                        break;
                    }
                    for i in start..(start + GRAIN).min(extent) {
                        kernel(i);
                    }
                });
            }
        })
        .map_err(|_| Error::LaneFailure { kernel: name })
    }

    /// Split `data` into consecutive chunks of `chunk_len` and run
    /// `kernel(k, chunk)` for the `k`th chunk.  Each chunk is owned
    /// by exactly one lane for the duration of the call.
    pub fn parallel_chunks<T, F>(
        &self,
        name: &'static str,
        data: &mut [T],
        chunk_len: usize,
        kernel: F,
    ) -> Result<()>
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        if data.is_empty() || chunk_len == 0 {
            return Ok(());
        }
        let chunks = (data.len() + chunk_len - 1) / chunk_len;
        trace!("dispatch {} over {} chunks", name, chunks);
        let lanes = self.lanes.min(chunks);
        if lanes <= 1 {
            return inline(name, || {
                data.chunks_mut(chunk_len)
                    .enumerate()
                    .for_each(|(k, chunk)| kernel(k, chunk))
            });
        }

        let work = Arc::new(Mutex::new(data.chunks_mut(chunk_len).enumerate()));
        let kernel = &kernel;
        crossbeam::scope(|spawner| {
            for _ in 0..lanes {
                let work = work.clone();
                spawner.spawn(move |_| loop {
                    let next = { work.lock().map(|mut w| w.next()) };
                    match next {
                        Ok(Some((k, chunk))) => kernel(k, chunk),
                        _ => break,
                    }
                });
            }
        })
        .map_err(|_| Error::LaneFailure { kernel: name })
    }
}

// Single-lane dispatches run on the caller's thread, with the same
// panic reporting as the pooled path.
fn inline<F: FnOnce()>(name: &'static str, work: F) -> Result<()> {
    panic::catch_unwind(AssertUnwindSafe(work)).map_err(|_| Error::LaneFailure { kernel: name })
}
