#![no_main]

use libfuzzer_sys::fuzz_target;

use witness_types::{Identity, InboundEvent};
use witness_workflow::{classify, parse_command, Inbound};

// Classify arbitrary message bodies with and without a pending photo.
// Routing must never panic, and echoes must return the body untouched.
fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_command(body);

    let sender = Identity::new("+15550000001");
    let event = InboundEvent::text(sender.clone(), body);
    for pending in [None, Some(&sender)] {
        if let Inbound::Echo(text) = classify(&event, pending) {
            assert_eq!(text, body);
        }
    }
});
