use std::time::Duration;

use criterion::{Criterion, Throughput};
use prefab_array::prelude::Layout;

/// Criterion tuned for short, allocation-bound layout runs.
pub fn bench_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(30)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3))
}

/// Throughput counted in generated placements.
pub fn placements_throughput(layout: &Layout) -> Throughput {
    instances_throughput(layout.placement_count())
}

pub fn instances_throughput(instances: usize) -> Throughput {
    Throughput::Elements(instances.max(1) as u64)
}
