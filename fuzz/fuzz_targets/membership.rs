#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let _ = polysect::arbitrary::arbtests::membership(&mut u);
    let _ = polysect::arbitrary::arbtests::shrinks(&mut Unstructured::new(data));
});
