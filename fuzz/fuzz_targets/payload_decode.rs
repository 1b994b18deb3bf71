#![no_main]

//! Decodes arbitrary bytes as a payload of every type family.
//!
//! Malformed input must surface as a `DecodeError`, never a panic.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    for family in graphbind_types::families() {
        if let Ok(record) = graphbind_json::record_from_value(&value, family.factory) {
            let _ = record.additional_data();
            let _ = record.odata_type();
        }
    }
});
