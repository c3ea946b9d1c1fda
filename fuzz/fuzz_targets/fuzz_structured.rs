#![no_main]

use libfuzzer_sys::fuzz_target;
use arbitrary::{Arbitrary, Unstructured};
use json_treediff::{compare, DiffReport, JsonValue, RenderOptions};
use std::collections::BTreeSet;

#[derive(Arbitrary, Debug)]
struct FuzzPair {
    left: FuzzValue,
    right: FuzzValue,
    tolerance: f64,
    ignore_numeric_types: bool,
    indent_size: u8,
    trim_size: u8,
}

#[derive(Arbitrary, Debug)]
enum FuzzValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<FuzzValue>),
    Object(Vec<(String, FuzzValue)>),
}

impl FuzzValue {
    fn to_value(&self) -> JsonValue {
        match self {
            FuzzValue::Null => JsonValue::Null,
            FuzzValue::Bool(b) => JsonValue::Bool(*b),
            FuzzValue::Int(i) => JsonValue::Int(*i),
            FuzzValue::Float(f) if f.is_nan() => JsonValue::Null,
            FuzzValue::Float(f) => JsonValue::Float(*f),
            FuzzValue::String(s) => JsonValue::String(s.clone()),
            FuzzValue::Array(items) => {
                JsonValue::Array(items.iter().map(|v| v.to_value()).collect())
            }
            FuzzValue::Object(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    if let Ok(pair) = FuzzPair::arbitrary(&mut u) {
        let left = pair.left.to_value();
        let right = pair.right.to_value();

        let Ok(mut diff) = compare(&left, &right) else {
            return;
        };

        let options = RenderOptions {
            indent_size: pair.indent_size as usize,
            trim_size: pair.trim_size as usize,
        };

        // Rendering must not depend on anything but the tree
        let first = diff.render(&options);
        assert_eq!(first, compare(&left, &right).unwrap().render(&options));
        assert_eq!(first == "(empty)", diff.is_equal());

        if pair.ignore_numeric_types {
            diff.ignore_numeric_type_diff();
        }

        // A looser tolerance never keeps anything a stricter one removed
        let tolerance = pair.tolerance.abs();
        let mut strict = diff.clone();
        strict.ignore_numeric_value_diff(tolerance);
        let mut loose = diff.clone();
        loose.ignore_numeric_value_diff(tolerance * 2.0);
        strict.flatten();
        loose.flatten();
        let strict_keys: BTreeSet<String> = strict.children().keys().map(|k| k.to_string()).collect();
        for key in loose.children().keys() {
            assert!(strict_keys.contains(&key.to_string()));
        }

        diff.flatten();
        assert!(diff.children().values().all(|child| child.children().is_empty()));
        let _ = DiffReport::from_diff(&diff).to_json_pretty();
    }
});
