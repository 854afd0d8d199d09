//! Watching the pool calibrate its default capacity to observed traffic.
//!
//! Run with:
//!     cargo run --example pool_calibration

use bucketbuf::{BufferPool, PoolConfig};

fn main() {
    let pool = BufferPool::with_config(
        PoolConfig::default()
            .with_observe_every(1000)
            .with_calibrate_threshold(1000)
            .with_percentile(0.95)
            .with_metrics(|stats| {
                println!(
                    "calibration #{}: default capacity now {} bytes",
                    stats.calibrations, stats.default_capacity
                );
            }),
    );

    println!("initial default capacity: {}", pool.default_capacity());

    // Phase 1: mostly small messages
    for i in 0..5000 {
        let buf = pool.get_sized(200 + i % 300);
        pool.put(buf);
    }

    // Phase 2: traffic shifts to large payloads
    for i in 0..5000 {
        let buf = pool.get_sized(9000 + i % 6000);
        pool.put(buf);
    }

    // Plain get() now follows the traffic
    let buf = pool.get();
    println!("get() hands out {} bytes", buf.capacity());
    pool.put(buf);
}
