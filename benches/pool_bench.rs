//! Benchmarks for bucketbuf.
//!
//! Run with:
//!     cargo bench

use std::sync::Arc;
use std::thread;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use bucketbuf::{Buffer, BufferPool, PoolConfig};

fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool");

    // Different request sizes, hitting the small path, a mid class and the top class
    for size in [32, 4 * 1024, 64 * 1024] {
        let pool = BufferPool::default();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("get_put_{}b", size), |b| {
            b.iter(|| {
                let mut buf = pool.get_sized(black_box(size));
                buf.reserve(size)[0] = 1;
                pool.put(buf);
            });
        });
    }

    // Baseline: fresh allocation every time
    group.bench_function("alloc_4096b", |b| {
        b.iter(|| {
            let mut buf = Buffer::new(black_box(4096));
            buf.reserve(4096)[0] = 1;
            black_box(buf.len())
        });
    });

    // Leak tracking overhead
    group.bench_function("get_put_tracked", |b| {
        let pool = BufferPool::with_config(PoolConfig::default().with_leak_detection(true));
        b.iter(|| {
            let buf = pool.get_sized(black_box(4096));
            pool.put(buf);
        });
    });

    group.finish();
}

fn bench_buffer(c: &mut Criterion) {
    use std::io::Read;

    let mut group = c.benchmark_group("buffer");
    let size = 1024 * 1024; // 1 MB
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("read_from", |b| {
        let mut buf = Buffer::new(size);
        b.iter(|| {
            buf.reset();
            let n = buf.read_from(&mut black_box(&data[..])).unwrap();
            black_box(n)
        });
    });

    // Write small frames and read them back; steady state should only compact
    group.bench_function("compacting_stream", |b| {
        let mut buf = Buffer::new(16 * 1024);
        let frame = [0xABu8; 1500];
        let mut scratch = [0u8; 1000];
        b.iter(|| {
            let mut total = 0usize;
            for _ in 0..64 {
                buf.write_bytes(black_box(&frame));
                total += buf.read(&mut scratch).unwrap();
            }
            buf.reset();
            black_box(total)
        });
    });

    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");
    let threads = 4;
    let iters = 1000;

    group.bench_function("get_put_4_threads", |b| {
        let pool = Arc::new(BufferPool::default());
        b.iter(|| {
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let pool = Arc::clone(&pool);
                    thread::spawn(move || {
                        for i in 0..iters {
                            let buf = pool.get_sized((i * 37 + t) % 8192);
                            pool.put(buf);
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pool, bench_buffer, bench_contended);
criterion_main!(benches);
