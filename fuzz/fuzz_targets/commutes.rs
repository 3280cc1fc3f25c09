#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = polysect::arbitrary::arbtests::commutes(&mut Unstructured::new(data));
});
