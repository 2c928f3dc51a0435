// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod pipeline_bench;

use criterion::{criterion_group, criterion_main};
use pipeline_bench::bench_pipeline;
use reorder_buffer_bench::bench_reorder_buffer;

criterion_group!(core_benches, bench_reorder_buffer, bench_pipeline);
criterion_main!(core_benches);
