#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Never fails: any input yields a (possibly empty) issue list.
        let _ = teif::teif::validate_structure(s);
    }
});
