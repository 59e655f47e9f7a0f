#![no_main]

use dashgrid_layout::size_to_blocks;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };
    let size = size_to_blocks(token);
    assert!((1..=3).contains(&size.w()));
    assert!((1..=3).contains(&size.h()));
    assert_eq!(size_to_blocks(&size.to_string()), size);
});
