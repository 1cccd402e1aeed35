use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dbits::bitvec::BitVector;
use dbits::naive::NaiveBitVector;

const N: usize = 1 << 16;

fn build_front(block_size: usize, count: usize) -> BitVector {
    let mut bv = BitVector::with_block_size(block_size);
    for i in 0..count {
        bv.insert(0, i % 2 == 0).unwrap();
    }
    bv
}

fn bench_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("edits");

    for block_size in [8usize, 512] {
        group.bench_function(format!("insert_front/s{block_size}"), |b| {
            b.iter(|| black_box(build_front(block_size, N)));
        });
        group.bench_function(format!("delete_front/s{block_size}"), |b| {
            b.iter_batched(
                || build_front(block_size, N),
                |mut bv| {
                    for _ in 0..N {
                        bv.remove(0).unwrap();
                    }
                    black_box(bv)
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.bench_function("insert_front/naive", |b| {
        b.iter(|| {
            let mut nv = NaiveBitVector::new();
            for i in 0..N {
                nv.insert(0, i % 2 == 0).unwrap();
            }
            black_box(nv)
        });
    });

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    for block_size in [8usize, 512] {
        let bv = build_front(block_size, N);
        group.bench_function(format!("rank/s{block_size}"), |b| {
            b.iter(|| {
                for i in 0..N {
                    black_box(bv.rank(i / 2 + 1, i % 2 == 0));
                }
            })
        });
        group.bench_function(format!("select/s{block_size}"), |b| {
            b.iter(|| {
                for k in 1..=N / 2 {
                    black_box(bv.select(k, true).unwrap());
                }
            })
        });
        group.bench_function(format!("access/s{block_size}"), |b| {
            b.iter(|| {
                for i in 0..N {
                    black_box(bv.get(i).unwrap());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_edits, bench_queries);
criterion_main!(benches);
