#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let ceiling = u16::from_le_bytes([data[0], data[1]]) as usize;
    if let Ok(s) = std::str::from_utf8(&data[2..]) {
        let doc = teif::teif::enforce_size(s, ceiling);
        assert!(doc.final_size() <= doc.original_size());
        assert_eq!(doc.final_size(), doc.text().len());
    }
});
