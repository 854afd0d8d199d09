//! Sharing a BufferPool across threads with scoped borrows.
//!
//! Run with:
//!     cargo run --example pool_borrow

use std::sync::Arc;
use std::thread;

use bucketbuf::{BufferPool, PoolConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pool = Arc::new(BufferPool::with_config(
        PoolConfig::default()
            .with_size_classes([512, 4096, 32768])
            .with_leak_detection(true),
    ));

    println!("size classes: {:?}\n", pool.size_classes().as_slice());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let mut total = 0;
                for i in 0..1000 {
                    // Returned to the pool at the end of each iteration
                    let mut buf = pool.borrow(100 + (i * 37 + worker * 11) % 20_000);
                    buf.write_str("frame");
                    total += buf.len();
                }
                total
            })
        })
        .collect();

    for (worker, handle) in handles.into_iter().enumerate() {
        let total = handle.join().map_err(|_| "worker panicked")?;
        println!("worker {}: {} bytes framed", worker, total);
    }

    let stats = pool.stats();
    println!("\n{:#?}", stats);
    println!("reuse ratio: {:.1}%", stats.reuse_ratio() * 100.0);
    println!("idle buffers: {}", pool.retained());

    Ok(())
}
