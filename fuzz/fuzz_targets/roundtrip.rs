#![no_main]

//! Anything that decodes must serialize, and decode again to an equal record.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    family: u8,
    payload: String,
}

fuzz_target!(|input: Input| {
    let families = graphbind_types::families();
    let family = &families[usize::from(input.family) % families.len()];

    let Ok(record) = graphbind_json::record_from_str(&input.payload, family.factory) else {
        return;
    };

    let written = graphbind_json::to_value(&record).expect("decoded records serialize");
    let again = graphbind_json::record_from_value(&written, family.factory)
        .expect("serialized records decode");
    assert_eq!(again, record, "payload {}", input.payload);
});
