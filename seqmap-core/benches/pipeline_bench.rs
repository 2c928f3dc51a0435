// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use criterion::{BenchmarkId, Criterion, Throughput};
use seqmap_core::{OrderedMapConfig, OrderedPipeline};
use std::hint::black_box;

/// Drive a pipeline by hand, completing the newest dispatched task first so
/// the reorder buffer is exercised at every concurrency level.
fn run(size: u64, concurrency: usize) -> u64 {
    let Ok(config) = OrderedMapConfig::new(concurrency) else {
        return 0;
    };
    let mut pipeline = OrderedPipeline::<u64, u64>::new(config);
    let mut inputs = 0..size;
    let mut running = Vec::with_capacity(concurrency);
    let mut sum = 0;

    while !pipeline.is_finished() {
        while pipeline.wants_input() {
            match inputs.next() {
                Some(input) => {
                    let _ = pipeline.offer(input);
                }
                None => pipeline.upstream_finished(),
            }
        }
        running.extend(std::iter::from_fn(|| pipeline.next_dispatch()));
        if let Some((index, input)) = running.pop() {
            let _ = pipeline.complete(index, Ok(input * 2));
        }
        while let Some(item) = pipeline.next_output() {
            sum += item.ok().unwrap_or_default();
        }
    }
    sum
}

pub fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let size = 10_000u64;

    for &concurrency in &[1usize, 4, 16, 64] {
        let id = BenchmarkId::from_parameter(format!("c{concurrency}"));
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(id, &concurrency, |bencher, &concurrency| {
            bencher.iter(|| black_box(run(size, concurrency)));
        });
    }

    group.finish();
}
