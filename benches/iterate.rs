// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[macro_use]
extern crate criterion;

use buddhabrot::reduce::max_of;
use buddhabrot::{Accelerator, BuddhabrotGenerator, IterationRange, RenderConfig};
use criterion::{black_box, Criterion};
use std::cell::RefCell;

fn iterate_pass(c: &mut Criterion) {
    let config = RenderConfig::default()
        .with_dimension(256)
        .with_points(128 * 128)
        .with_ranges([
            IterationRange::new(0, 64),
            IterationRange::new(64, 256),
            IterationRange::new(256, 1024),
        ])
        .with_warmup(16)
        .with_seed(Some(1));
    let generator = RefCell::new(BuddhabrotGenerator::new(Accelerator::default(), config).unwrap());
    c.bench_function("iterate 128x128 points", move |b| {
        b.iter(|| generator.borrow_mut().iterate().unwrap())
    });
}

fn reduce_max(c: &mut Criterion) {
    let accel = Accelerator::default();
    let values: Vec<u32> = (0..1024 * 1024u64).map(|i| (i * 7919 % 65_521) as u32).collect();
    c.bench_function("tree max of 1M cells", move |b| {
        b.iter(|| max_of(&accel, black_box(&values)).unwrap())
    });
}

criterion_group!(benches, iterate_pass, reduce_max);
criterion_main!(benches);
