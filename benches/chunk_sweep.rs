// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Chunk-size sweep.  Total wall-clock time is not monotone in the
//! chunk size: tiny chunks pay per-assignment overhead, huge chunks
//! starve the load balancer.  This sweep reproduces that curve for a
//! fixed grid and farm shape.

#[macro_use]
extern crate criterion;
extern crate mandelfarm;
extern crate num;

use criterion::Criterion;
use mandelfarm::{Coordinator, Grid};
use num::Complex;

fn chunk_size_sweep(c: &mut Criterion) {
    c.bench_function_over_inputs(
        "chunk_size",
        |b, &chunk_size| {
            let grid = Grid::new(
                320,
                240,
                Complex::new(-2.0, -1.5),
                Complex::new(1.0, 1.5),
                1000,
            )
            .unwrap();
            b.iter(|| {
                Coordinator::new(grid, chunk_size, 2, 2)
                    .unwrap()
                    .run()
            })
        },
        vec![1, 10, 40, 100, 200, 240],
    );
}

criterion_group!(benches, chunk_size_sweep);
criterion_main!(benches);
