#![no_main]

use libfuzzer_sys::fuzz_target;

// Decode arbitrary lines from the signald socket.
// Malformed JSON must produce an error, never a panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = witness_transport::signald::decode_line(line);
    }
});
