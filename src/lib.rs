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


//! Structural differences between two JSON trees of unknown shape.
//!
//! [`compare`] classifies every divergence between two [`JsonValue`]s into a
//! [`Diff`] tree. The tree can be pruned with
//! [`Diff::ignore_numeric_type_diff`] and [`Diff::ignore_numeric_value_diff`],
//! collapsed with [`Diff::flatten`], and rendered with [`Diff::render`]:
//!
//! ```
//! use json_treediff::{compare, JsonValue, RenderOptions};
//! use serde_json::json;
//!
//! let before = JsonValue::from(json!({"layerHeight": 0.2, "doRaft": true}));
//! let after = JsonValue::from(json!({"layerHeight": 0.4}));
//!
//! let diff = compare(&before, &after).unwrap();
//! assert_eq!(
//!     diff.render(&RenderOptions::default()),
//!     "doRaft:\n  --- true was removed\nlayerHeight:\n  ::: 0.2 and 0.4 do not match"
//! );
//! ```

pub mod diagnostics;
pub mod diff;
pub mod pointer;
pub mod render;
pub mod report;
pub mod transform;
pub mod value;

pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticCollector, DiagnosticLevel};
pub use diff::{compare, compare_with_limit, Diff, Divergence, Key, Segment, DEFAULT_MAX_DEPTH};
pub use pointer::JsonPointer;
pub use render::{render, RenderOptions};
pub use report::{ChangeKind, DiffReport, ReportEntry};
pub use transform::{Edit, Transform};
pub use value::{JsonValue, Kind};
