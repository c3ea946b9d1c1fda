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


use serde::Serialize;
use serde_json::Value;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::diff::{Diff, Divergence};
use crate::value::{JsonValue, Kind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Type,
    NumericType,
    Value,
}

/// One leaf difference, addressed by its flattened path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub path: String,
    pub change: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Value>,
    pub left_type: Kind,
    pub right_type: Kind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffReport {
    pub entries: Vec<ReportEntry>,
}

impl DiffReport {
    /// Flattens a copy of `diff`; the root itself has the path `""`.
    pub fn from_diff(diff: &Diff) -> Self {
        let mut flat = diff.clone();
        flat.flatten();

        let mut entries = Vec::new();
        if let Some(entry) = entry_for(String::new(), &flat) {
            entries.push(entry);
        }
        entries.extend(
            flat.ordered_children()
                .into_iter()
                .filter_map(|(key, child)| entry_for(key.to_string(), child)),
        );

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String, Diagnostic> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Diagnostic::fatal(
                DiagnosticCode::SerializationFailed,
                format!("I couldn't serialize the report to JSON: {}", e),
            )
        })
    }
}

fn entry_for(path: String, diff: &Diff) -> Option<ReportEntry> {
    let divergence = diff.divergence()?;
    let (change, left, right) = match divergence {
        Divergence::Type { left, right } if left.is_missing() => (ChangeKind::Added, left, right),
        Divergence::Type { left, right } if right.is_missing() => {
            (ChangeKind::Removed, left, right)
        }
        Divergence::Type { left, right } => (ChangeKind::Type, left, right),
        Divergence::NumericType { left, right } => (ChangeKind::NumericType, left, right),
        Divergence::Value { left, right } => (ChangeKind::Value, left, right),
    };

    Some(ReportEntry {
        path,
        change,
        left: JsonValue::to_json(left),
        right: JsonValue::to_json(right),
        left_type: left.kind(),
        right_type: right.kind(),
    })
}
