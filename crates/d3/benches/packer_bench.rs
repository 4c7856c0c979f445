//! Benchmarks for 3D bin packing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cubestack_core::solver::Solver;
use cubestack_d3::{Bin, Config, GreedyPacker, ItemSpec, RotationMode, SelectionPolicy};

fn mixed_items(count: usize) -> Vec<ItemSpec> {
    (0..count)
        .map(|i| {
            let i = i as u32;
            ItemSpec::new(format!("B{}", i), 4 + i % 5, 3 + i % 4, 2 + i % 3)
        })
        .collect()
}

fn packer_benchmark(c: &mut Criterion) {
    let uniform: Vec<ItemSpec> = (0..20)
        .map(|i| ItemSpec::new(format!("B{}", i), 10, 10, 10))
        .collect();
    let mixed = mixed_items(40);
    let bin = Bin::new(40, 40, 40);

    for policy in [SelectionPolicy::FirstFit, SelectionPolicy::BestOfAll] {
        let packer = GreedyPacker::new(Config::default().with_policy(policy).without_time_limit());

        c.bench_function(&format!("{}_20_uniform_boxes", policy.name()), |b| {
            b.iter(|| {
                let result = packer.solve(black_box(&uniform), black_box(&bin));
                black_box(result)
            })
        });

        c.bench_function(&format!("{}_40_mixed_boxes", policy.name()), |b| {
            b.iter(|| {
                let result = packer.solve(black_box(&mixed), black_box(&bin));
                black_box(result)
            })
        });
    }

    let free = GreedyPacker::new(
        Config::default()
            .with_rotation_mode(RotationMode::Free)
            .without_time_limit(),
    );
    c.bench_function("best_of_all_40_mixed_free_rotation", |b| {
        b.iter(|| {
            let result = free.solve(black_box(&mixed), black_box(&bin));
            black_box(result)
        })
    });
}

criterion_group!(benches, packer_benchmark);
criterion_main!(benches);
