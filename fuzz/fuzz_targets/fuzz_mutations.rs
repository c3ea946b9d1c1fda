#![no_main]

use libfuzzer_sys::fuzz_target;
use json_treediff::{compare, JsonValue, RenderOptions, Transform};

const BASE_CONFIG: &str = r#"{
  "layerHeight": 0.2,
  "doRaft": true,
  "fanLayer": 1,
  "extruderProfiles": [{"extrusionProfiles": {"base": {"feedrate": 40, "fanSpeed": 0.5}}}],
  "modelShellProfiles": {"base": {"numberOfShells": 2, "innerExtrusionProfile": "base"}}
}"#;

const POINTERS: [&str; 8] = [
    "/layerHeight",
    "/doRaft",
    "/fanLayer",
    "/extruderProfiles/0",
    "/extruderProfiles/0/extrusionProfiles/base/feedrate",
    "/extruderProfiles/1",
    "/modelShellProfiles/base",
    "/modelShellProfiles/base/numberOfShells",
];

const VALUES: [&str; 6] = ["0", "0.4", "true", "\"base\"", "[1, 2]", "{\"x\": null}"];

fuzz_target!(|data: &[u8]| {
    let Ok(base) = serde_json::from_str::<serde_json::Value>(BASE_CONFIG) else {
        return;
    };
    let base = JsonValue::from(base);

    let mut sets = Vec::new();
    let mut removes = Vec::new();
    for &byte in data.iter().take(16) {
        let pointer = POINTERS[(byte as usize) % POINTERS.len()];
        if byte & 0x80 == 0 {
            let value = VALUES[(byte as usize >> 3) % VALUES.len()];
            sets.push(format!("{}={}", pointer, value));
        } else {
            removes.push(pointer.to_string());
        }
    }

    let Ok(transform) = Transform::from_options(&sets, &removes) else {
        return;
    };

    // Edits may legitimately fail, e.g. removing the same key twice
    if let Ok(edited) = transform.apply(&base) {
        if let Ok(diff) = compare(&base, &edited) {
            let text = diff.render(&RenderOptions::full());
            assert_eq!(text == "(empty)", diff.is_equal());
            assert_eq!(base == edited, diff.is_equal());
        }
    }
});
