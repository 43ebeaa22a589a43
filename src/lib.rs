#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Master-worker Mandelbrot renderer
//!
//! Computes the Mandelbrot escape-time set over a rectangular region
//! of the complex plane with two nested tiers of parallelism.  A
//! coordinator partitions the image into contiguous row chunks and
//! hands them out, first-come first-served, to a pool of workers; each
//! worker in turn spreads its chunk across threads that claim rows
//! dynamically as they finish their previous one.  Because the cost of
//! a pixel depends on how close it sits to the set's boundary, both
//! tiers deal work on demand rather than splitting it evenly up front.
//!
//! Completion order never affects the output: every pixel is written
//! exactly once at its grid offset, so the assembled matrix is
//! bit-for-bit the one a single-threaded scan would produce.

extern crate crossbeam;
extern crate itertools;
extern crate num;
#[macro_use]
extern crate failure;

pub mod chunks;
pub mod coordinator;
pub mod errors;
pub mod grid;
pub mod kernel;
pub mod matrix;
pub mod worker;

pub use chunks::{plan_chunks, Chunk};
pub use coordinator::{Coordinator, RunReport, RunTimings, WorkerState};
pub use errors::ConfigError;
pub use grid::Grid;
pub use kernel::escape_time;
pub use matrix::ResultMatrix;
pub use worker::{render_sequential, PartialResult, WorkerEngine};
