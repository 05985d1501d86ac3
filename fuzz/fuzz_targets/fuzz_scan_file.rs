#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use mzpick::reader::{PeakListReader, ScanFileReader};

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);

    // Arbitrary bytes must be rejected with an error, never a panic.
    if let Ok(reader) = ScanFileReader::from_bytes(bytes.clone()) {
        let _ = reader.read_source();
    }
    if let Ok(reader) = PeakListReader::from_bytes(bytes) {
        let _ = reader.read_peak_list();
    }
});
