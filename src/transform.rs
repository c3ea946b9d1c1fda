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


//! Edits that turn one configuration tree into the tree it is compared against.
//!
//! A transform is written on the command line as `--remove /pointer` and
//! `--set /pointer=<json>` options. Removals run first, then sets, each group
//! in the order given.

use serde_json::Value;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticCollector};
use crate::pointer::JsonPointer;
use crate::value::JsonValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Set { pointer: JsonPointer, value: JsonValue },
    Remove { pointer: JsonPointer },
}

impl Edit {
    /// Parses `/pointer=<json>`. The pointer ends at the first `=`.
    pub fn parse_set(text: &str) -> Result<Self, Diagnostic> {
        let Some((path, raw)) = text.split_once('=') else {
            return Err(Diagnostic::fatal(
                DiagnosticCode::InvalidEditSyntax,
                format!("I couldn't find '=' in the edit '{}'", text),
            )
            .with_advice("Write edits as --set /path/to/key=<json value>".to_string()));
        };

        let pointer = JsonPointer::new(path)?;
        let value = serde_json::from_str::<Value>(raw).map_err(|e| {
            Diagnostic::fatal(
                DiagnosticCode::InvalidEditSyntax,
                format!("I couldn't parse '{}' as a JSON value: {}", raw, e),
            )
            .with_advice(
                "The value must be JSON. Quote strings, for example:\n\
                 --set '/innerExtrusionProfile=\"base_layer_surface\"'"
                    .to_string(),
            )
        })?;

        Ok(Edit::Set {
            pointer,
            value: JsonValue::from(value),
        })
    }

    pub fn parse_remove(text: &str) -> Result<Self, Diagnostic> {
        let pointer = JsonPointer::new(text)?;
        if pointer.is_root() {
            return Err(Diagnostic::fatal(
                DiagnosticCode::InvalidPointerSyntax,
                "I can't remove the root value".to_string(),
            ));
        }
        Ok(Edit::Remove { pointer })
    }

    pub fn apply(&self, target: &mut JsonValue) -> Result<(), Diagnostic> {
        match self {
            Edit::Set { pointer, value } => pointer.set(target, value.clone()),
            Edit::Remove { pointer } => pointer.remove(target).map(|_| ()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transform {
    edits: Vec<Edit>,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Builds a transform from raw option values, reporting every bad edit at once.
    pub fn from_options(sets: &[String], removes: &[String]) -> Result<Self, Vec<Diagnostic>> {
        let mut transform = Transform::new();
        let mut diagnostics = DiagnosticCollector::new();

        let parsed = removes
            .iter()
            .map(|text| Edit::parse_remove(text))
            .chain(sets.iter().map(|text| Edit::parse_set(text)));

        for edit in parsed {
            match edit {
                Ok(edit) => transform.push(edit),
                Err(diagnostic) => diagnostics.add(diagnostic),
            }
        }

        if diagnostics.has_fatal() {
            return Err(diagnostics.into_diagnostics());
        }
        Ok(transform)
    }

    /// Applies every edit to a copy of `value`.
    pub fn apply(&self, value: &JsonValue) -> Result<JsonValue, Diagnostic> {
        let mut result = value.clone();
        for edit in &self.edits {
            edit.apply(&mut result)?;
        }
        debug!(edits = self.edits.len(), "applied transform");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_set() {
        let edit = Edit::parse_set("/layerHeight=0.4").unwrap();
        assert_eq!(
            edit,
            Edit::Set {
                pointer: JsonPointer::new("/layerHeight").unwrap(),
                value: JsonValue::Float(0.4),
            }
        );

        let edit = Edit::parse_set(r#"/profile={"a": [1, "x=y"]}"#).unwrap();
        match edit {
            Edit::Set { value, .. } => assert_eq!(value, JsonValue::from(json!({"a": [1, "x=y"]}))),
            _ => panic!("Expected Set edit"),
        }
    }

    #[test]
    fn test_parse_set_errors() {
        let error = Edit::parse_set("/layerHeight").unwrap_err();
        assert_eq!(error.code, DiagnosticCode::InvalidEditSyntax);

        let error = Edit::parse_set("/name=unquoted").unwrap_err();
        assert_eq!(error.code, DiagnosticCode::InvalidEditSyntax);

        let error = Edit::parse_set("name=1").unwrap_err();
        assert_eq!(error.code, DiagnosticCode::InvalidPointerSyntax);
    }

    #[test]
    fn test_removals_run_before_sets() {
        let transform = Transform::from_options(
            &["/baseLayer=2".to_string()],
            &["/baseLayer".to_string()],
        )
        .unwrap();
        assert_eq!(transform.len(), 2);

        let before = JsonValue::from(json!({"baseLayer": 1, "doRaft": true}));
        let after = transform.apply(&before).unwrap();
        assert_eq!(after, JsonValue::from(json!({"baseLayer": 2, "doRaft": true})));
        assert_eq!(before, JsonValue::from(json!({"baseLayer": 1, "doRaft": true})));
    }

    #[test]
    fn test_from_options_collects_all_errors() {
        let errors = Transform::from_options(
            &["bad".to_string(), "/ok=1".to_string()],
            &["".to_string()],
        )
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_apply_reports_missing_target() {
        let transform = Transform::from_options(&[], &["/absent".to_string()]).unwrap();
        let error = transform.apply(&JsonValue::from(json!({}))).unwrap_err();
        assert_eq!(error.code, DiagnosticCode::PointerTargetNotFound);
    }
}
