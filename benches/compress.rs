use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use ruhuff::huffman::{build_codes, build_tree};
use ruhuff::Histogram;

/// Bytes drawn from a skewed distribution so the tree is neither flat nor degenerate
fn skewed_data(size: usize) -> Vec<u8> {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(0xDEADBEEF);
    (0..size)
        .map(|_| {
            let a: u8 = rng.gen();
            let b: u8 = rng.gen();
            a.min(b) / 4
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    const DATA_SIZE: usize = 1024 * 1024;

    let data = skewed_data(DATA_SIZE);
    let histogram = Histogram::from_bytes(&data);
    let container = ruhuff::compress_to_vec(&data, 0o644).unwrap();

    c.bench_function("build tree and codes", |b| {
        b.iter(|| {
            let tree = build_tree(black_box(&histogram)).unwrap();
            build_codes(tree.as_deref()).unwrap()
        })
    });

    let mut group = c.benchmark_group("container");
    group.throughput(Throughput::Bytes(DATA_SIZE as u64));
    group.bench_function("compress", |b| {
        b.iter(|| ruhuff::compress_to_vec(black_box(&data), 0o644).unwrap())
    });
    group.bench_function("decompress", |b| {
        b.iter(|| ruhuff::decompress_to_vec(black_box(&container)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
