// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The chunk planner.  Runs once before distribution begins and
//! carves the grid's row range into the fixed-size pieces the
//! coordinator hands out.  The chunks partition `[0, height)` exactly:
//! no gaps, no overlaps.

use errors::ConfigError;
use std::cmp;
use std::ops::Range;

/// A contiguous half-open range of rows, the unit of work one worker
/// receives at a time.  Created once by `plan_chunks` and immutable
/// thereafter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in the planner's ascending-row order.
    pub id: usize,
    /// First row covered, inclusive.
    pub row_start: usize,
    /// One past the last row covered.
    pub row_end: usize,
}

impl Chunk {
    /// The rows this chunk covers, as an iterable range.
    pub fn rows(&self) -> Range<usize> {
        self.row_start..self.row_end
    }

    /// The number of rows in the chunk.
    pub fn len(&self) -> usize {
        self.row_end - self.row_start
    }

    /// Whether the chunk covers no rows.  The planner never produces
    /// such a chunk.
    pub fn is_empty(&self) -> bool {
        self.row_end == self.row_start
    }
}

/// Divides `[0, height)` into chunks of `chunk_size` rows in ascending
/// order, the last one holding whatever remains.  A `chunk_size` of at
/// least `height` yields a single chunk spanning the full range; zero
/// is an invalid configuration.
pub fn plan_chunks(height: usize, chunk_size: usize) -> Result<Vec<Chunk>, ConfigError> {
    if chunk_size == 0 {
        return Err(ConfigError::BadChunkSize);
    }
    let mut chunks = Vec::with_capacity((height + chunk_size - 1) / chunk_size);
    let mut row_start = 0;
    while row_start < height {
        let row_end = cmp::min(row_start + chunk_size, height);
        chunks.push(Chunk {
            id: chunks.len(),
            row_start,
            row_end,
        });
        row_start = row_end;
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_partition(height: usize, chunks: &[Chunk]) {
        let mut next = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.id, i);
            assert_eq!(chunk.row_start, next, "gap or overlap before chunk {}", i);
            assert!(chunk.row_end > chunk.row_start);
            next = chunk.row_end;
        }
        assert_eq!(next, height, "chunks do not cover the full row range");
    }

    #[test]
    fn even_division_has_no_runt() {
        let chunks = plan_chunks(400, 100).unwrap();
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.len() == 100));
        assert_exact_partition(400, &chunks);
    }

    #[test]
    fn remainder_lands_in_the_last_chunk() {
        let chunks = plan_chunks(450, 200).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 50);
        assert_exact_partition(450, &chunks);
    }

    #[test]
    fn oversized_chunk_yields_one_chunk() {
        let chunks = plan_chunks(30, 100).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].rows(), 0..30);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert_eq!(plan_chunks(30, 0).unwrap_err(), ConfigError::BadChunkSize);
    }

    #[test]
    fn partition_is_exact_across_sizes() {
        for &height in &[1, 2, 37, 128, 481] {
            for &chunk_size in &[1, 2, 40, 200, 400] {
                let chunks = plan_chunks(height, chunk_size).unwrap();
                assert_exact_partition(height, &chunks);
            }
        }
    }

    #[test]
    fn small_grid_scenario_yields_two_chunks() {
        let chunks = plan_chunks(4, 2).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].rows(), 0..2);
        assert_eq!(chunks[1].rows(), 2..4);
    }
}
