//! Filling pooled buffers from tokio readers through the futures-io compat layer.
//!
//! Run with:
//!     cargo run --example async_fill --features async-io

use std::sync::Arc;

use bucketbuf::BufferPool;
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pool = Arc::new(BufferPool::new(4096));

    // Create multiple data streams
    let streams: Vec<Vec<u8>> = vec![
        (0..50_000).map(|i| (i % 256) as u8).collect(),
        (0..3_000).map(|i| (i % 7) as u8).collect(),
        (0..120_000).map(|i| (i % 13) as u8).collect(),
    ];

    let handles: Vec<_> = streams
        .into_iter()
        .enumerate()
        .map(|(stream_id, data)| {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move {
                let reader = tokio::io::BufReader::new(&data[..]);
                let mut buf = pool.borrow(data.len());
                let n = buf.read_from_async(reader.compat()).await?;
                Ok::<_, bucketbuf::BufferError>((stream_id, n, buf.capacity()))
            })
        })
        .collect();

    for handle in handles {
        let (stream_id, n, capacity) = handle.await??;
        println!("stream {}: {} bytes into a {} byte buffer", stream_id, n, capacity);
    }

    println!("\n{:#?}", pool.stats());
    Ok(())
}
