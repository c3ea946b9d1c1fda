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


//! Indented text report for a [`Diff`] tree.
//!
//! Every leaf line starts with a stable marker so the report can be grepped:
//!
//! - `+++` added, `---` removed
//! - `***` different types, `###` different numeric types
//! - `:::` different values
//!
//! A tree without differences renders as `(empty)`.

use crate::diff::{Diff, Divergence, Key};
use crate::value::JsonValue;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces added per nesting level.
    pub indent_size: usize,
    /// Scalars longer than this are cut and suffixed with `...`.
    pub trim_size: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_size: 2,
            trim_size: 12,
        }
    }
}

impl RenderOptions {
    /// Wide enough to show whole values in typical configuration files.
    pub fn full() -> Self {
        Self {
            trim_size: 300,
            ..Self::default()
        }
    }
}

impl Diff {
    pub fn render(&self, options: &RenderOptions) -> String {
        render(self, options, true)
    }
}

/// Renders `diff`. Keys directly under a root are written without a leading dot.
pub fn render(diff: &Diff, options: &RenderOptions, is_root: bool) -> String {
    if diff.is_added() {
        if let Some(Divergence::Type { right, .. }) = diff.divergence() {
            return format!("+++ {} was added", trimmed(right, options.trim_size));
        }
    }

    if diff.is_removed() {
        if let Some(Divergence::Type { left, .. }) = diff.divergence() {
            return format!("--- {} was removed", trimmed(left, options.trim_size));
        }
    }

    match diff.divergence() {
        Some(Divergence::Type { left, right }) => {
            return format!(
                "*** {} and {} have different types ({} vs {})",
                trimmed(left, options.trim_size),
                trimmed(right, options.trim_size),
                left.kind(),
                right.kind()
            );
        }
        Some(Divergence::NumericType { left, right }) => {
            return format!(
                "### {} and {} have different numeric types ({} vs {})",
                trimmed(left, options.trim_size),
                trimmed(right, options.trim_size),
                left.kind(),
                right.kind()
            );
        }
        // Numbers are short; show them whole so close values stay distinguishable.
        Some(Divergence::Value { left, right }) if left.is_numeric() => {
            return format!("::: {} and {} do not match", left, right);
        }
        Some(Divergence::Value { left, right }) => {
            return format!(
                "::: {} and {} do not match",
                trimmed(left, options.trim_size),
                trimmed(right, options.trim_size)
            );
        }
        None => {}
    }

    let sections: Vec<String> = diff
        .ordered_children()
        .into_iter()
        .filter(|(_, child)| !child.is_equal())
        .map(|(key, child)| {
            format!(
                "{}:\n{}",
                key_label(key, is_root),
                indent(&render(child, options, false), options.indent_size)
            )
        })
        .collect();

    if sections.is_empty() {
        return "(empty)".to_string();
    }
    sections.join("\n")
}

fn key_label(key: &Key, is_root: bool) -> String {
    if !is_root && key.starts_with_field() {
        format!(".{}", key)
    } else {
        key.to_string()
    }
}

fn indent(text: &str, size: usize) -> String {
    let pad = " ".repeat(size);
    format!("{}{}", pad, text.replace('\n', &format!("\n{}", pad)))
}

/// Strings are shown raw and quoted after truncation; everything else as compact JSON.
fn trimmed(value: &JsonValue, trim_size: usize) -> String {
    let mut text = match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };

    if text.chars().count() > trim_size.saturating_add(ELLIPSIS.len()) {
        text = text.chars().take(trim_size).collect::<String>() + ELLIPSIS;
    }

    match value {
        JsonValue::String(_) => format!("\"{}\"", text),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compare;
    use serde_json::json;

    fn report(left: serde_json::Value, right: serde_json::Value) -> String {
        compare(&JsonValue::from(left), &JsonValue::from(right))
            .unwrap()
            .render(&RenderOptions::default())
    }

    #[test]
    fn test_equal_renders_empty() {
        let value = json!({"a": [1, {"b": "c"}]});
        assert_eq!(report(value.clone(), value), "(empty)");
    }

    #[test]
    fn test_added_and_removed() {
        assert_eq!(report(json!({}), json!({"a": 1})), "a:\n  +++ 1 was added");
        assert_eq!(report(json!({"a": 1}), json!({})), "a:\n  --- 1 was removed");
    }

    #[test]
    fn test_type_and_numeric_type() {
        assert_eq!(
            report(json!("1"), json!(1)),
            "*** \"1\" and 1 have different types (string vs int)"
        );
        assert_eq!(
            report(json!(1), json!(1.0)),
            "### 1 and 1.0 have different numeric types (int vs float)"
        );
    }

    #[test]
    fn test_value_diff() {
        assert_eq!(report(json!(1.0), json!(1.2)), "::: 1.0 and 1.2 do not match");
        assert_eq!(report(json!(true), json!(false)), "::: true and false do not match");
    }

    #[test]
    fn test_tolerance_filter_keeps_report_line() {
        let mut diff = compare(&JsonValue::Float(1.0), &JsonValue::Float(1.2)).unwrap();
        diff.ignore_numeric_value_diff(0.1);
        assert_eq!(
            diff.render(&RenderOptions::default()),
            "::: 1.0 and 1.2 do not match"
        );
    }

    #[test]
    fn test_nested_layout() {
        let text = report(
            json!({"b": {"x": [1, 2], "y": "same"}, "a": 1}),
            json!({"b": {"x": [1, 3, 4], "y": "same"}, "a": 2}),
        );
        let expected = "\
a:
  ::: 1 and 2 do not match
b:
  .x:
    [1]:
      ::: 2 and 3 do not match
    [2]:
      +++ 4 was added";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_custom_indent() {
        let diff = compare(
            &JsonValue::from(json!({"a": {"b": 1}})),
            &JsonValue::from(json!({"a": {"b": 2}})),
        )
        .unwrap();
        let options = RenderOptions {
            indent_size: 4,
            ..RenderOptions::default()
        };
        assert_eq!(
            diff.render(&options),
            "a:\n    .b:\n        ::: 1 and 2 do not match"
        );
    }

    #[test]
    fn test_long_values_are_trimmed() {
        let text = report(json!("abcdefghijklmnopqrstuvwxyz"), json!("short"));
        assert_eq!(text, "::: \"abcdefghijkl...\" and \"short\" do not match");

        // Within trim_size + 3 nothing is cut
        let text = report(json!("abcdefghijklmno"), json!("x"));
        assert_eq!(text, "::: \"abcdefghijklmno\" and \"x\" do not match");

        let text = report(json!({}), json!({"a": [1, 2, 3, 4, 5, 6]}));
        assert_eq!(text, "a:\n  +++ [1, 2, 3, 4,... was added");
    }

    #[test]
    fn test_full_width_keeps_values() {
        let long = "a fairly long string value that goes on";
        let diff = compare(
            &JsonValue::from(json!({"s": long})),
            &JsonValue::from(json!({"s": "b"})),
        )
        .unwrap();
        let text = diff.render(&RenderOptions::full());
        assert!(text.contains(&format!("\"{}\"", long)));
    }

    #[test]
    fn test_flattened_layout() {
        let mut diff = compare(
            &JsonValue::from(json!({"a": {"b": [0, 1, 2]}, "c": [{"d": 1}]})),
            &JsonValue::from(json!({"a": {"b": [0, 1, 3]}, "c": [{"d": 2}]})),
        )
        .unwrap();
        diff.flatten();
        assert_eq!(
            diff.render(&RenderOptions::default()),
            "a.b[2]:\n  ::: 2 and 3 do not match\nc[0].d:\n  ::: 1 and 2 do not match"
        );
    }

    #[test]
    fn test_widest_trim_keeps_values() {
        let diff = compare(
            &JsonValue::String("abcdef".into()),
            &JsonValue::String("b".into()),
        )
        .unwrap();
        let options = RenderOptions {
            indent_size: 2,
            trim_size: usize::MAX,
        };
        assert_eq!(diff.render(&options), "::: \"abcdef\" and \"b\" do not match");
    }

    #[test]
    fn test_flattened_keys_sort_as_text() {
        let mut diff = compare(
            &JsonValue::from(json!({"a": {"x": 1}, "a-b": 1})),
            &JsonValue::from(json!({"a": {"x": 2}, "a-b": 2})),
        )
        .unwrap();
        diff.flatten();
        let text = diff.render(&RenderOptions::default());
        assert_eq!(
            text,
            "a-b:\n  ::: 1 and 2 do not match\na.x:\n  ::: 1 and 2 do not match"
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let left = JsonValue::from(json!({"z": 1, "a": 1, "m": [1, 2, 3], "b": {"q": 1, "p": 2}}));
        let right = JsonValue::from(json!({"m": [3, 2], "b": {"p": 3, "q": 1}, "a": 2, "new": null}));
        let first = compare(&left, &right).unwrap().render(&RenderOptions::default());
        let second = compare(&left, &right).unwrap().render(&RenderOptions::default());
        assert_eq!(first, second);
        assert!(first.find("a:").unwrap() < first.find("b:").unwrap());
        assert!(first.find("m:").unwrap() < first.find("new:").unwrap());
    }
}
