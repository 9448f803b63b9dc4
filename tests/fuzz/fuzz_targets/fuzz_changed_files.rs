#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Changed-files parser must not panic on any input.
    let _ = covdelta::changed::parse_changed_files(data);
});
