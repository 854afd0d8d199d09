//! Basic Buffer usage: writing, zero-copy reserve, reading and compaction.
//!
//! Run with:
//!     cargo run --example buffer_basic

use std::io::Read;

use bucketbuf::Buffer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut buf = Buffer::new(16);

    buf.write_str("hello, ");
    // Fill in place without an intermediate copy
    buf.reserve(5).copy_from_slice(b"world");
    println!("contents: {:?} (len={}, cap={})", buf.to_string(), buf.len(), buf.capacity());

    // Consume a prefix
    let mut head = [0u8; 7];
    buf.read_exact(&mut head)?;
    println!("read: {:?}", String::from_utf8_lossy(&head));

    // The consumed prefix is reclaimed instead of reallocating
    buf.write_str("!!!!!!!!");
    println!("after compaction: {:?} (cap={})", buf.to_string(), buf.capacity());

    // Growth beyond capacity rounds up to a power of two
    buf.write_str(" and then some more text");
    println!("after growth: cap={}", buf.capacity());

    // Bulk transfer to any io::Write
    let mut out = Vec::new();
    let n = buf.write_to(&mut out)?;
    println!("wrote {} bytes, buffer empty: {}", n, buf.is_empty());

    Ok(())
}
