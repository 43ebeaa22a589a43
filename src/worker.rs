// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The worker engine: computes every pixel of one assigned chunk
//! across a pool of threads.  Threads do not get an equal split up
//! front; each one claims the next unclaimed row the moment it
//! finishes its current one.  Rows near the set boundary cost close to
//! the full iteration cap while exterior rows are nearly free, and
//! claiming on demand is what keeps the threads' finish times close
//! together despite that.
//!
//! The row queue is the only synchronized state.  A claimed row hands
//! the thread an exclusive slice of the output buffer, so pixel writes
//! need no lock at all.

use crossbeam::thread::ScopedJoinHandle;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chunks::Chunk;
use errors::ConfigError;
use grid::Grid;
use itertools::iproduct;
use kernel::escape_time;
use matrix::ResultMatrix;

/// The iteration counts for exactly one chunk's rows, plus how long
/// each thread spent on its share.  Produced by `WorkerEngine::compute`
/// and consumed once by the aggregator.
#[derive(Clone, Debug)]
pub struct PartialResult {
    /// The chunk these counts cover.
    pub chunk: Chunk,
    /// Row-major counts for the chunk's rows, `chunk.len() * width`
    /// cells starting at the chunk's first row.
    pub counts: Vec<u32>,
    /// Wall-clock seconds per thread, keyed by thread index within
    /// the worker.  Unordered by nature; used to diagnose imbalance.
    pub timings: HashMap<usize, f64>,
}

/// Computes chunks with a fixed-size pool of row-claiming threads.
#[derive(Copy, Clone, Debug)]
pub struct WorkerEngine {
    threads: usize,
}

impl WorkerEngine {
    /// Constructor.  A zero thread count is an invalid configuration.
    pub fn new(threads: usize) -> Result<WorkerEngine, ConfigError> {
        if threads == 0 {
            return Err(ConfigError::BadThreadCount);
        }
        Ok(WorkerEngine { threads })
    }

    /// The number of threads this engine spreads a chunk across.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Computes all pixels in `chunk` and returns their counts along
    /// with per-thread timings.
    ///
    /// Each queue entry pairs a row index with the mutable slice of
    /// the output buffer that row owns, so claiming a row is the only
    /// synchronized step and two threads can never write the same
    /// offset.
    pub fn compute(&self, grid: &Grid, chunk: Chunk) -> PartialResult {
        let width = grid.width;
        let mut counts = vec![0_u32; chunk.len() * width];
        let mut timings = HashMap::with_capacity(self.threads);

        crossbeam::scope(|spawner| {
            let rows = Arc::new(Mutex::new(chunk.rows().zip(counts.chunks_mut(width))));
            let handles: Vec<ScopedJoinHandle<(usize, f64)>> = (0..self.threads)
                .map(|thread| {
                    let rows = rows.clone();
                    spawner.spawn(move |_| {
                        let clock = Instant::now();
                        loop {
                            let claim = { rows.lock().unwrap().next() };
                            match claim {
                                Some((row, cells)) => {
                                    for (col, cell) in cells.iter_mut().enumerate() {
                                        let c = grid.point_for(col, row);
                                        *cell = escape_time(c, grid.max_iter);
                                    }
                                }
                                None => {
                                    break;
                                }
                            }
                        }
                        (thread, clock.elapsed().as_secs_f64())
                    })
                })
                .collect();

            for handle in handles {
                let (thread, seconds) = handle.join().unwrap();
                timings.insert(thread, seconds);
            }
        })
        .unwrap();

        PartialResult {
            chunk,
            counts,
            timings,
        }
    }
}

/// The strict single-threaded reference computation: a plain raster
/// scan of the whole grid through the same kernel.  Parallel runs must
/// reproduce this matrix bit for bit; the test suite leans on that.
pub fn render_sequential(grid: &Grid) -> ResultMatrix {
    let mut matrix = ResultMatrix::new(grid);
    for (row, col) in iproduct!(0..grid.height, 0..grid.width) {
        let count = escape_time(grid.point_for(col, row), grid.max_iter);
        matrix.set(row, col, count);
    }
    matrix
}
