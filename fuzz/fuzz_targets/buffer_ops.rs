#![no_main]

use std::collections::VecDeque;
use std::io::Read;

use bucketbuf::Buffer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    // Each pair of input bytes is one operation; a VecDeque is the model.
    let mut buf = Buffer::new(data.first().copied().unwrap_or(0) as usize);
    let mut model: VecDeque<u8> = VecDeque::new();

    for op in data.chunks(2) {
        let (kind, arg) = (op[0], op.get(1).copied().unwrap_or(0) as usize);
        match kind % 6 {
            0 => {
                let bytes: Vec<u8> = (0..arg).map(|i| i as u8).collect();
                buf.write_bytes(&bytes);
                model.extend(bytes);
            }
            1 => {
                buf.write_byte(arg as u8);
                model.push_back(arg as u8);
            }
            2 => {
                let mut dst = vec![0u8; arg];
                let n = buf.read(&mut dst).unwrap();
                let expected: Vec<u8> = model.drain(..n.min(model.len())).collect();
                assert_eq!(&dst[..n], &expected[..]);
                if arg > 0 {
                    assert_eq!(n, expected.len().min(arg));
                }
            }
            3 => {
                let cap = buf.capacity();
                buf.grow(arg);
                assert!(buf.capacity() - (buf.raw_bytes().len()) >= arg || arg == 0);
                assert!(buf.capacity() >= cap);
            }
            4 => {
                let slot = buf.reserve(arg);
                slot.fill(0x5A);
                model.extend(std::iter::repeat_n(0x5A, arg));
            }
            _ => {
                let mut out = Vec::new();
                buf.write_to(&mut out).unwrap();
                let expected: Vec<u8> = model.drain(..).collect();
                assert_eq!(out, expected);
            }
        }

        // Verify: unread bytes always match the model
        assert_eq!(buf.len(), model.len());
        assert!(buf.as_bytes().iter().eq(model.iter()));
    }
});
