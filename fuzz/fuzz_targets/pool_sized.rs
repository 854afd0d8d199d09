#![no_main]

use bucketbuf::{BufferPool, PoolConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<u16>, Vec<u16>)| {
    let (classes, sizes) = input;
    let pool = BufferPool::with_config(
        PoolConfig::default()
            .with_size_classes(classes.iter().map(|&c| c as usize))
            .with_observe_every(8)
            .with_calibrate_threshold(4),
    );

    let mut held = Vec::new();
    for (i, &size) in sizes.iter().enumerate() {
        let size = size as usize;

        // Verify: every request is satisfied
        let mut buf = pool.get_sized(size);
        assert!(buf.capacity() >= size);
        assert!(buf.is_empty());

        // Grow some buffers past their class before returning them
        if i % 3 == 0 {
            buf.reserve(size / 2 + 1);
        }
        if i % 4 == 0 {
            held.push(buf);
        } else {
            pool.put(buf);
        }

        // Verify: the default capacity is always a size class
        assert!(pool.size_classes().as_slice().contains(&pool.default_capacity()));
    }

    for buf in held {
        pool.put(buf);
    }
    let stats = pool.stats();
    assert_eq!(stats.gets, sizes.len() as u64);
    assert_eq!(stats.puts, sizes.len() as u64);
});
