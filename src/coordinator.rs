// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The distribution coordinator: the master role of the master-worker
//! protocol.  It owns the pool of not-yet-assigned chunks, hands the
//! next one (FIFO, ascending row order) to whichever worker comes back
//! idle, folds every submitted partial into the global matrix, and
//! declares the run complete once the pool is drained and no partial
//! is outstanding.
//!
//! Assignment is deliberately greedy: a worker whose chunk was cheap
//! asks again sooner and ends up doing more chunks.  That is the
//! chunk-level twin of the row claiming inside each worker.
//!
//! Workers here are threads exchanging chunks and partials over
//! channels, which keeps the protocol testable in one process; a
//! deployment across real nodes would swap the channel for a wire
//! transport and change nothing else.

use crossbeam::channel::{unbounded, Sender};
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use chunks::{plan_chunks, Chunk};
use errors::ConfigError;
use grid::Grid;
use matrix::ResultMatrix;
use worker::{PartialResult, WorkerEngine};

/// Whether a worker currently holds an unfinished chunk.  A worker is
/// `Idle` only before its first assignment; afterwards it is either
/// computing (`Busy`) or retired (`Done`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkerState {
    /// Registered, no chunk assigned yet.
    Idle,
    /// Computing an assigned chunk.
    Busy,
    /// Retired; the pool was empty when the worker last reported in.
    Done,
}

// A completed chunk coming back from a worker, with the worker's own
// wall-clock for it.
struct Submission {
    worker: usize,
    partial: PartialResult,
    elapsed: f64,
}

/// Elapsed-time telemetry for one run, collected for the external
/// reporting collaborator.  Both maps are unordered; times for a
/// worker or thread that handled several chunks are summed.
#[derive(Clone, Debug, Default)]
pub struct RunTimings {
    /// Total seconds each worker spent computing, keyed by worker id.
    pub per_worker: HashMap<usize, f64>,
    /// Seconds per thread within each worker, keyed by
    /// `(worker id, thread index)`.
    pub per_thread: HashMap<(usize, usize), f64>,
}

/// Everything a finished run hands to external collaborators: the
/// frozen matrix for visualization and the timing maps for telemetry.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// The completed iteration-count matrix.
    pub matrix: ResultMatrix,
    /// Per-worker and per-thread elapsed times.
    pub timings: RunTimings,
}

/// Owns the chunk pool and worker registry for one run.  Built once,
/// consumed by `run`; nothing here is global state.
#[derive(Debug)]
pub struct Coordinator {
    grid: Grid,
    pool: VecDeque<Chunk>,
    workers: usize,
    engine: WorkerEngine,
}

impl Coordinator {
    /// Constructor.  Validates the worker and thread counts and runs
    /// the chunk planner once, populating the pool in ascending row
    /// order.
    pub fn new(
        grid: Grid,
        chunk_size: usize,
        workers: usize,
        threads: usize,
    ) -> Result<Coordinator, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::BadWorkerCount);
        }
        let engine = WorkerEngine::new(threads)?;
        let pool: VecDeque<Chunk> = plan_chunks(grid.height, chunk_size)?.into();
        Ok(Coordinator {
            grid,
            pool,
            workers,
            engine,
        })
    }

    /// How many chunks remain unassigned.  Before `run` this is the
    /// full partition count.
    pub fn chunk_count(&self) -> usize {
        self.pool.len()
    }

    /// Drives the run to completion and returns the frozen matrix
    /// plus telemetry.
    ///
    /// Every worker gets a chunk up front (workers beyond the chunk
    /// count retire immediately).  Then, for each submission: fold the
    /// partial into the matrix at its row offset, and either hand that
    /// worker the next chunk or, if the pool is empty, drop its
    /// assignment channel so its receive loop ends.  The run is
    /// complete when every worker has retired.
    pub fn run(mut self) -> RunReport {
        let mut matrix = ResultMatrix::new(&self.grid);
        let mut timings = RunTimings::default();
        let mut states = vec![WorkerState::Idle; self.workers];
        let (submit_tx, submit_rx) = unbounded();
        let grid = self.grid;
        let engine = self.engine;

        crossbeam::scope(|spawner| {
            let mut assignments: Vec<Option<Sender<Chunk>>> = Vec::with_capacity(self.workers);
            for worker in 0..self.workers {
                let (chunk_tx, chunk_rx) = unbounded::<Chunk>();
                assignments.push(Some(chunk_tx));
                let submit_tx = submit_tx.clone();
                spawner.spawn(move |_| {
                    // Runs until the coordinator drops this worker's
                    // assignment sender.
                    for chunk in chunk_rx.iter() {
                        let clock = Instant::now();
                        let partial = engine.compute(&grid, chunk);
                        let elapsed = clock.elapsed().as_secs_f64();
                        submit_tx
                            .send(Submission {
                                worker,
                                partial,
                                elapsed,
                            })
                            .unwrap();
                    }
                });
            }
            drop(submit_tx);

            let mut outstanding = 0;
            for worker in 0..self.workers {
                match self.pool.pop_front() {
                    Some(chunk) => {
                        assignments[worker].as_ref().unwrap().send(chunk).unwrap();
                        states[worker] = WorkerState::Busy;
                        outstanding += 1;
                    }
                    None => {
                        assignments[worker] = None;
                        states[worker] = WorkerState::Done;
                    }
                }
            }

            while outstanding > 0 {
                let submission = submit_rx.recv().unwrap();
                states[submission.worker] = WorkerState::Idle;
                matrix.insert(&submission.partial);
                *timings.per_worker.entry(submission.worker).or_insert(0.0) +=
                    submission.elapsed;
                for (&thread, &seconds) in &submission.partial.timings {
                    *timings
                        .per_thread
                        .entry((submission.worker, thread))
                        .or_insert(0.0) += seconds;
                }
                match self.pool.pop_front() {
                    Some(chunk) => {
                        assignments[submission.worker]
                            .as_ref()
                            .unwrap()
                            .send(chunk)
                            .unwrap();
                        states[submission.worker] = WorkerState::Busy;
                    }
                    None => {
                        assignments[submission.worker] = None;
                        states[submission.worker] = WorkerState::Done;
                        outstanding -= 1;
                    }
                }
            }
        })
        .unwrap();

        debug_assert!(states.iter().all(|&state| state == WorkerState::Done));
        RunReport { matrix, timings }
    }
}
