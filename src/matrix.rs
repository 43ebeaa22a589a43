// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The result aggregator.  Owns the full iteration-count matrix and
//! merges each worker's partial buffer at the chunk's row offset, so
//! the assembled image is the same no matter what order chunks finish
//! in.

use chunks::Chunk;
use grid::Grid;
use worker::PartialResult;

/// A dense row-major matrix of escape-iteration counts, one cell per
/// pixel, each in `[0, max_iter]`.  Allocated once per run and never
/// resized; every cell is written exactly once over the run.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultMatrix {
    /// Width of the matrix in pixels.
    pub width: usize,
    /// Height of the matrix in pixels.
    pub height: usize,
    /// The iteration cap the counts were computed under; cells equal
    /// to it are in the set.
    pub max_iter: u32,
    cells: Vec<u32>,
}

impl ResultMatrix {
    /// Allocates a zeroed matrix sized to the grid.
    pub fn new(grid: &Grid) -> ResultMatrix {
        ResultMatrix {
            width: grid.width,
            height: grid.height,
            max_iter: grid.max_iter,
            cells: vec![0; grid.len()],
        }
    }

    /// Writes one chunk's counts into the matrix at linear offsets
    /// `[row_start * width, row_end * width)`.  Each chunk arrives
    /// exactly once by construction; the coordinator never re-assigns
    /// a completed chunk.
    pub fn insert(&mut self, partial: &PartialResult) {
        let chunk: Chunk = partial.chunk;
        assert!(chunk.row_end <= self.height, "chunk rows out of range");
        assert_eq!(
            partial.counts.len(),
            chunk.len() * self.width,
            "partial buffer does not match its chunk"
        );
        let offset = chunk.row_start * self.width;
        self.cells[offset..offset + partial.counts.len()].copy_from_slice(&partial.counts);
    }

    /// Writes a single cell.  Used by the single-threaded reference
    /// path; the parallel tiers go through `insert`.
    pub fn set(&mut self, row: usize, col: usize, count: u32) {
        self.cells[row * self.width + col] = count;
    }

    /// Reads the count at a pixel.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.width + col]
    }

    /// The matrix as a flat row-major slice, for palette mapping and
    /// serialization by external collaborators.
    pub fn as_slice(&self) -> &[u32] {
        &self.cells
    }

    /// The total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the matrix holds no cells.  Never true for a matrix
    /// built from a constructed Grid.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunks::plan_chunks;
    use num::Complex;
    use std::collections::HashMap;
    use worker::WorkerEngine;

    fn test_grid() -> Grid {
        Grid::new(6, 9, Complex::new(-2.0, -1.5), Complex::new(1.0, 1.5), 60).unwrap()
    }

    fn partials_for(grid: &Grid, chunk_size: usize) -> Vec<PartialResult> {
        let engine = WorkerEngine::new(1).unwrap();
        plan_chunks(grid.height, chunk_size)
            .unwrap()
            .into_iter()
            .map(|chunk| engine.compute(grid, chunk))
            .collect()
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let grid = test_grid();
        let partials = partials_for(&grid, 2);

        let mut forward = ResultMatrix::new(&grid);
        for partial in &partials {
            forward.insert(partial);
        }

        let mut backward = ResultMatrix::new(&grid);
        for partial in partials.iter().rev() {
            backward.insert(partial);
        }

        let mut interleaved = ResultMatrix::new(&grid);
        for i in (0..partials.len()).step_by(2).chain((1..partials.len()).step_by(2)) {
            interleaved.insert(&partials[i]);
        }

        assert_eq!(forward, backward);
        assert_eq!(forward, interleaved);
    }

    #[test]
    fn counts_stay_within_the_cap() {
        let grid = test_grid();
        let mut matrix = ResultMatrix::new(&grid);
        for partial in &partials_for(&grid, 3) {
            matrix.insert(partial);
        }
        assert!(matrix.as_slice().iter().all(|&n| n <= grid.max_iter));
    }

    #[test]
    #[should_panic(expected = "partial buffer does not match its chunk")]
    fn mismatched_partial_is_a_bug() {
        let grid = test_grid();
        let mut matrix = ResultMatrix::new(&grid);
        let partial = PartialResult {
            chunk: Chunk { id: 0, row_start: 0, row_end: 2 },
            counts: vec![0; 5],
            timings: HashMap::new(),
        };
        matrix.insert(&partial);
    }
}
