// json-treediff is a tool for reporting structural differences between JSON trees
// Copyright (C) 2025  Peoples Grocers LLC
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//
// To purchase a license under different terms contact admin@peoplesgrocers.com
// To request changes, report bugs, or give user feedback contact
// marxism@peoplesgrocers.com
//


//! The closed value model compared by the diff engine.
//!
//! `JsonValue` mirrors `serde_json::Value`, except that integers and floats
//! are separate variants and there is one extra variant, `Missing`, which the
//! engine uses to stand in for a key or index that only exists on one side.
//! Parsed input never contains `Missing`.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(BTreeMap<String, JsonValue>),
    Missing,
}

/// The discriminant of a `JsonValue`.
///
/// `Bool` is its own kind and never belongs to the numeric family. Configuration
/// files use `true` and `1` for unrelated fields, and treating them as the same
/// number would hide real changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
    Missing,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Missing => "missing",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Kind::Int | Kind::Float)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Bounds of the f64 range that converts to i64 without saturating.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

impl JsonValue {
    pub fn kind(&self) -> Kind {
        match self {
            JsonValue::Null => Kind::Null,
            JsonValue::Bool(_) => Kind::Bool,
            JsonValue::Int(_) => Kind::Int,
            JsonValue::Float(_) => Kind::Float,
            JsonValue::String(_) => Kind::String,
            JsonValue::Array(_) => Kind::Array,
            JsonValue::Object(_) => Kind::Object,
            JsonValue::Missing => Kind::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, JsonValue::Missing)
    }

    pub fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }

    /// Exact numeric equality across the int/float split, so `1 == 1.0`.
    /// NaN equals NaN here, so a tree built with NaN still compares equal to itself.
    ///
    /// Returns `None` unless both sides are numeric.
    pub fn numeric_eq(&self, other: &JsonValue) -> Option<bool> {
        let equal = match (self, other) {
            (JsonValue::Int(a), JsonValue::Int(b)) => a == b,
            (JsonValue::Float(a), JsonValue::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (JsonValue::Int(i), JsonValue::Float(f)) | (JsonValue::Float(f), JsonValue::Int(i)) => {
                f.fract() == 0.0 && *f >= I64_LOWER && *f < I64_UPPER && *f as i64 == *i
            }
            _ => return None,
        };
        Some(equal)
    }

    /// Absolute distance between two numeric values, `None` unless both are numeric.
    pub fn numeric_distance(&self, other: &JsonValue) -> Option<f64> {
        match (self, other) {
            (JsonValue::Int(a), JsonValue::Int(b)) => Some((*a as i128 - *b as i128).unsigned_abs() as f64),
            (JsonValue::Int(a), JsonValue::Float(b)) => Some((*a as f64 - b).abs()),
            (JsonValue::Float(a), JsonValue::Int(b)) => Some((a - *b as f64).abs()),
            (JsonValue::Float(a), JsonValue::Float(b)) => Some((a - b).abs()),
            _ => None,
        }
    }

    /// Converts back to a `serde_json::Value`.
    ///
    /// Fails for trees that contain `Missing` and for NaN or infinite floats,
    /// neither of which JSON can represent.
    pub fn to_json(&self) -> Option<Value> {
        let value = match self {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Int(i) => Value::from(*i),
            JsonValue::Float(f) => Value::Number(serde_json::Number::from_f64(*f)?),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::Array(
                items
                    .iter()
                    .map(JsonValue::to_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            JsonValue::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| Some((key.clone(), value.to_json()?)))
                    .collect::<Option<serde_json::Map<_, _>>>()?,
            ),
            JsonValue::Missing => return None,
        };
        Some(value)
    }

    fn write_compact(&self, out: &mut String) {
        match self {
            JsonValue::Null => out.push_str("null"),
            JsonValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            JsonValue::Int(i) => out.push_str(&i.to_string()),
            JsonValue::Float(f) => out.push_str(&format_float(*f)),
            JsonValue::String(s) => out.push_str(&Value::String(s.clone()).to_string()),
            JsonValue::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_compact(out);
                }
                out.push(']');
            }
            JsonValue::Object(fields) => {
                out.push('{');
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&Value::String(key.clone()).to_string());
                    out.push_str(": ");
                    value.write_compact(out);
                }
                out.push('}');
            }
            JsonValue::Missing => out.push_str("<missing>"),
        }
    }
}

/// Floats always keep a fractional part or exponent so `1.0` never reads as `1`.
fn format_float(f: f64) -> String {
    match serde_json::Number::from_f64(f) {
        Some(number) => number.to_string(),
        None if f.is_nan() => "NaN".to_string(),
        None if f > 0.0 => "Infinity".to_string(),
        None => "-Infinity".to_string(),
    }
}

/// Compact JSON with `", "` and `": "` separators. Strings are quoted.
impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_compact(&mut out);
        f.write_str(&out)
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => JsonValue::Int(i),
                // u64 values above i64::MAX land here too and lose precision
                None => JsonValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => JsonValue::String(s),
            Value::Array(items) => JsonValue::Array(items.into_iter().map(JsonValue::from).collect()),
            Value::Object(fields) => JsonValue::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, JsonValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        JsonValue::from(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_split_into_int_and_float() {
        assert_eq!(JsonValue::from(json!(3)), JsonValue::Int(3));
        assert_eq!(JsonValue::from(json!(3.0)), JsonValue::Float(3.0));
        assert_eq!(JsonValue::from(json!(-7)).kind(), Kind::Int);
        assert_eq!(JsonValue::from(json!(u64::MAX)).kind(), Kind::Float);
    }

    #[test]
    fn test_bool_is_not_numeric() {
        let value = JsonValue::from(json!(true));
        assert_eq!(value.kind(), Kind::Bool);
        assert!(!value.is_numeric());
        assert_eq!(value.numeric_eq(&JsonValue::Int(1)), None);
    }

    #[test]
    fn test_missing_equals_only_missing() {
        assert_eq!(JsonValue::Missing, JsonValue::Missing);
        assert_ne!(JsonValue::Missing, JsonValue::Null);
        assert_ne!(JsonValue::Null, JsonValue::Missing);
    }

    #[test]
    fn test_numeric_eq_across_subtypes() {
        assert_eq!(JsonValue::Int(1).numeric_eq(&JsonValue::Float(1.0)), Some(true));
        assert_eq!(JsonValue::Float(1.5).numeric_eq(&JsonValue::Int(1)), Some(false));
        assert_eq!(
            JsonValue::Int(i64::MAX).numeric_eq(&JsonValue::Float(9_223_372_036_854_775_808.0)),
            Some(false)
        );
        assert_eq!(JsonValue::Int(1).numeric_eq(&JsonValue::String("1".into())), None);
        assert_eq!(
            JsonValue::Float(f64::NAN).numeric_eq(&JsonValue::Float(f64::NAN)),
            Some(true)
        );
        assert_eq!(JsonValue::Float(f64::NAN).numeric_eq(&JsonValue::Float(1.0)), Some(false));
    }

    #[test]
    fn test_numeric_distance_does_not_overflow() {
        let distance = JsonValue::Int(i64::MIN).numeric_distance(&JsonValue::Int(i64::MAX));
        assert_eq!(distance, Some(u64::MAX as f64));
        assert_eq!(JsonValue::Int(2).numeric_distance(&JsonValue::Float(0.5)), Some(1.5));
    }

    #[test]
    fn test_display_is_compact_json() {
        let value = JsonValue::from(json!({"b": [1, 2.5, "x"], "a": null, "c": true}));
        assert_eq!(value.to_string(), r#"{"a": null, "b": [1, 2.5, "x"], "c": true}"#);
        assert_eq!(JsonValue::Float(1.0).to_string(), "1.0");
        assert_eq!(JsonValue::Float(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_to_json_rejects_missing() {
        let value = JsonValue::Array(vec![JsonValue::Int(1), JsonValue::Missing]);
        assert_eq!(value.to_json(), None);

        let value = JsonValue::from(json!({"a": [1, 2.5]}));
        assert_eq!(value.to_json(), Some(json!({"a": [1, 2.5]})));
    }
}
