#![no_main]

use libfuzzer_sys::fuzz_target;
use json_treediff::{compare, JsonValue, RenderOptions};

fuzz_target!(|data: &[u8]| {
    // Anything that parses as JSON must compare equal to itself
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let value = JsonValue::from(value);
        if let Ok(diff) = compare(&value, &value) {
            assert!(diff.is_equal());
            assert_eq!(diff.render(&RenderOptions::default()), "(empty)");
        }
    }
});
