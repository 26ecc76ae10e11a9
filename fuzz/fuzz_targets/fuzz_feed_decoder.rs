//! Fuzz target: `decode_body`
//!
//! Splits the input into a path and a response body and feeds both to the
//! decoder.  It must never panic and never return more updates than a
//! batch can hold.
//!
//! cargo fuzz run fuzz_feed_decoder

#![no_main]

use awning::remote::feed::{MAX_UPDATES, decode_body};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let split = data.iter().position(|&b| b == b'\n').unwrap_or(0);
    let (path, body) = data.split_at(split);
    let Ok(path) = core::str::from_utf8(path) else {
        return;
    };

    if let Ok(batch) = decode_body(path, body) {
        assert!(batch.len() <= MAX_UPDATES);
        for update in &batch {
            assert!(update.path().is_inbound());
        }
    }
});
