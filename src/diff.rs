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


use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::value::{JsonValue, Kind};

/// Containers nested deeper than this are rejected by [`compare`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

static MISSING: JsonValue = JsonValue::Missing;

/// One step of a path into a JSON tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Index(usize),
    Field(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SegmentRef<'a> {
    Index(usize),
    Field(&'a str),
}

impl Segment {
    fn view(&self) -> SegmentRef<'_> {
        match self {
            Segment::Index(i) => SegmentRef::Index(*i),
            Segment::Field(name) => SegmentRef::Field(name),
        }
    }
}

/// Address of a child diff inside its parent.
///
/// `Path` keys only appear after [`Diff::flatten`]. A field whose name holds a
/// dot or bracket, such as `"a.b"`, displays the same as the path `a` then `b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Field(String),
    Index(usize),
    Path(Vec<Segment>),
}

impl Key {
    fn segments(&self) -> impl Iterator<Item = SegmentRef<'_>> {
        let (head, tail): (Option<SegmentRef<'_>>, &[Segment]) = match self {
            Key::Field(name) => (Some(SegmentRef::Field(name)), &[][..]),
            Key::Index(i) => (Some(SegmentRef::Index(*i)), &[][..]),
            Key::Path(segments) => (None, segments.as_slice()),
        };
        head.into_iter().chain(tail.iter().map(Segment::view))
    }

    fn into_segments(self) -> Vec<Segment> {
        match self {
            Key::Field(name) => vec![Segment::Field(name)],
            Key::Index(i) => vec![Segment::Index(i)],
            Key::Path(segments) => segments,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Key::Index(_) => 0,
            Key::Field(_) => 1,
            Key::Path(_) => 2,
        }
    }

    pub(crate) fn starts_with_field(&self) -> bool {
        matches!(self.segments().next(), Some(SegmentRef::Field(_)))
    }
}

// Keys compare segment by segment: indices numerically, field names
// lexicographically, an index before a field. This stays a total order once
// flatten mixes composite paths with plain keys.
impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments()
            .cmp(other.segments())
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// `name`, `[3]`, or a composite such as `a.b[2]` or `[0].x`.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments().enumerate() {
            match segment {
                SegmentRef::Index(index) => write!(f, "[{}]", index)?,
                SegmentRef::Field(name) if i == 0 => f.write_str(name)?,
                SegmentRef::Field(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Field(name.to_string())
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

/// How a leaf pair diverged. The three outcomes exclude each other.
#[derive(Debug, Clone, PartialEq)]
pub enum Divergence {
    /// Different kinds, including one side being `Missing`.
    Type { left: JsonValue, right: JsonValue },
    /// Numerically equal, but one is an int and the other a float.
    NumericType { left: JsonValue, right: JsonValue },
    /// Same kind, different value.
    Value { left: JsonValue, right: JsonValue },
}

/// The classified comparison of one pair of values.
///
/// A leaf carries at most one [`Divergence`]. An array or object pair carries
/// instead a map of the children that differ.
#[derive(Debug, Clone, PartialEq)]
pub struct Diff {
    left_kind: Kind,
    divergence: Option<Divergence>,
    children: BTreeMap<Key, Diff>,
}

/// Compares two values with the default depth limit.
pub fn compare(left: &JsonValue, right: &JsonValue) -> Result<Diff, Diagnostic> {
    compare_with_limit(left, right, DEFAULT_MAX_DEPTH)
}

/// Compares two values, failing if containers nest more than `max_depth` levels.
///
/// Mismatches never fail; they are recorded in the returned tree.
pub fn compare_with_limit(
    left: &JsonValue,
    right: &JsonValue,
    max_depth: usize,
) -> Result<Diff, Diagnostic> {
    let mut comparer = Comparer {
        max_depth,
        path: Vec::new(),
    };
    comparer.compare(left, right)
}

struct Comparer {
    max_depth: usize,
    path: Vec<Segment>,
}

impl Comparer {
    fn compare(&mut self, left: &JsonValue, right: &JsonValue) -> Result<Diff, Diagnostic> {
        let mut diff = Diff::leaf(left.kind(), None);

        match (left, right) {
            (JsonValue::Missing, JsonValue::Missing) => {}
            (JsonValue::Missing, _) | (_, JsonValue::Missing) => {
                diff.divergence = Some(Divergence::Type {
                    left: left.clone(),
                    right: right.clone(),
                });
            }
            (JsonValue::Null, JsonValue::Null) => {}
            (JsonValue::Bool(a), JsonValue::Bool(b)) => {
                if a != b {
                    diff.divergence = Some(value_divergence(left, right));
                }
            }
            (JsonValue::String(a), JsonValue::String(b)) => {
                if a != b {
                    diff.divergence = Some(value_divergence(left, right));
                }
            }
            (JsonValue::Int(_) | JsonValue::Float(_), JsonValue::Int(_) | JsonValue::Float(_)) => {
                if left.numeric_eq(right) != Some(true) {
                    diff.divergence = Some(value_divergence(left, right));
                } else if left.kind() != right.kind() {
                    diff.divergence = Some(Divergence::NumericType {
                        left: left.clone(),
                        right: right.clone(),
                    });
                }
            }
            (JsonValue::Array(a), JsonValue::Array(b)) => {
                self.enter_container()?;
                diff.children = self.compare_arrays(a, b)?;
            }
            (JsonValue::Object(a), JsonValue::Object(b)) => {
                self.enter_container()?;
                diff.children = self.compare_objects(a, b)?;
            }
            _ => {
                diff.divergence = Some(Divergence::Type {
                    left: left.clone(),
                    right: right.clone(),
                });
            }
        }

        Ok(diff)
    }

    fn enter_container(&self) -> Result<(), Diagnostic> {
        if self.path.len() < self.max_depth {
            return Ok(());
        }
        let location = Key::Path(self.path.clone()).to_string();
        Err(Diagnostic::fatal(
            DiagnosticCode::MaxDepthExceeded,
            format!(
                "I stopped comparing at '{}' because the values nest more than {} levels deep.",
                if location.is_empty() { "<root>" } else { location.as_str() },
                self.max_depth
            ),
        )
        .with_advice(
            "Structures this deep are usually generated by mistake. \
             If the nesting is intentional, raise the depth limit."
                .to_string(),
        ))
    }

    fn compare_child(
        &mut self,
        segment: Segment,
        left: &JsonValue,
        right: &JsonValue,
    ) -> Result<Diff, Diagnostic> {
        self.path.push(segment);
        let result = self.compare(left, right);
        self.path.pop();
        result
    }

    fn compare_arrays(
        &mut self,
        left: &[JsonValue],
        right: &[JsonValue],
    ) -> Result<BTreeMap<Key, Diff>, Diagnostic> {
        let mut children = BTreeMap::new();
        let longest = left.len().max(right.len());

        for i in 0..longest {
            let a = left.get(i).unwrap_or(&MISSING);
            let b = right.get(i).unwrap_or(&MISSING);
            let child = self.compare_child(Segment::Index(i), a, b)?;
            if !child.is_equal() {
                children.insert(Key::Index(i), child);
            }
        }

        Ok(children)
    }

    fn compare_objects(
        &mut self,
        left: &BTreeMap<String, JsonValue>,
        right: &BTreeMap<String, JsonValue>,
    ) -> Result<BTreeMap<Key, Diff>, Diagnostic> {
        let mut children = BTreeMap::new();

        // Changed and removed keys
        for (key, a) in left {
            let b = right.get(key).unwrap_or(&MISSING);
            let child = self.compare_child(Segment::Field(key.clone()), a, b)?;
            if !child.is_equal() {
                children.insert(Key::Field(key.clone()), child);
            }
        }

        // Added keys
        for (key, b) in right {
            if !left.contains_key(key) {
                let child = self.compare_child(Segment::Field(key.clone()), &MISSING, b)?;
                children.insert(Key::Field(key.clone()), child);
            }
        }

        Ok(children)
    }
}

fn value_divergence(left: &JsonValue, right: &JsonValue) -> Divergence {
    Divergence::Value {
        left: left.clone(),
        right: right.clone(),
    }
}

impl Diff {
    fn leaf(left_kind: Kind, divergence: Option<Divergence>) -> Self {
        Self {
            left_kind,
            divergence,
            children: BTreeMap::new(),
        }
    }

    pub fn left_kind(&self) -> Kind {
        self.left_kind
    }

    pub fn divergence(&self) -> Option<&Divergence> {
        self.divergence.as_ref()
    }

    pub fn children(&self) -> &BTreeMap<Key, Diff> {
        &self.children
    }

    /// Looks up a child by the text form of its key, e.g. `"name"`, `"[2]"` or `"a.b[2]"`.
    ///
    /// Returns `None` when the text matches more than one key, which happens when
    /// a field name like `"a.b"` sits next to the flattened path `a.b`.
    pub fn child(&self, key: &str) -> Option<&Diff> {
        let mut matches = self
            .children
            .iter()
            .filter(|(k, _)| k.to_string() == key)
            .map(|(_, diff)| diff);
        match (matches.next(), matches.next()) {
            (Some(diff), None) => Some(diff),
            _ => None,
        }
    }

    /// Children in report order.
    ///
    /// Once flatten has put composite paths in the map, every key sorts by its
    /// text form. Otherwise field names sort lexicographically and indices numerically.
    pub fn ordered_children(&self) -> Vec<(&Key, &Diff)> {
        let mut children: Vec<(&Key, &Diff)> = self.children.iter().collect();
        if self.children.keys().any(|key| matches!(key, Key::Path(_))) {
            // Stable, so keys with the same text keep their map order
            children.sort_by_cached_key(|(key, _)| key.to_string());
        }
        children
    }

    pub fn get(&self, key: &Key) -> Option<&Diff> {
        self.children.get(key)
    }

    pub fn is_equal(&self) -> bool {
        self.divergence.is_none() && self.children.is_empty()
    }

    pub fn is_added(&self) -> bool {
        matches!(&self.divergence, Some(Divergence::Type { left, .. }) if left.is_missing())
    }

    pub fn is_removed(&self) -> bool {
        matches!(&self.divergence, Some(Divergence::Type { right, .. }) if right.is_missing())
    }

    pub fn is_type_diff(&self) -> bool {
        matches!(self.divergence, Some(Divergence::Type { .. }))
    }

    pub fn is_numeric_type_diff(&self) -> bool {
        matches!(self.divergence, Some(Divergence::NumericType { .. }))
    }

    pub fn is_value_diff(&self) -> bool {
        matches!(self.divergence, Some(Divergence::Value { .. }))
    }

    /// A value diff whose left operand is numeric. Only the left side is inspected.
    pub fn is_numeric_value_diff(&self) -> bool {
        matches!(&self.divergence, Some(Divergence::Value { left, .. }) if left.is_numeric())
    }

    pub fn is_array_diff(&self) -> bool {
        !self.children.is_empty() && self.left_kind == Kind::Array
    }

    pub fn is_object_diff(&self) -> bool {
        !self.children.is_empty() && self.left_kind == Kind::Object
    }

    pub fn type_diff(&self) -> Option<(Kind, Kind)> {
        match &self.divergence {
            Some(Divergence::Type { left, right }) => Some((left.kind(), right.kind())),
            _ => None,
        }
    }

    pub fn numeric_type_diff(&self) -> Option<(Kind, Kind)> {
        match &self.divergence {
            Some(Divergence::NumericType { left, right }) => Some((left.kind(), right.kind())),
            _ => None,
        }
    }

    pub fn value_diff(&self) -> Option<(&JsonValue, &JsonValue)> {
        match &self.divergence {
            Some(Divergence::Value { left, right }) => Some((left, right)),
            _ => None,
        }
    }

    /// Drops int/float mismatches between numerically equal values, then
    /// prunes every child that became equal.
    pub fn ignore_numeric_type_diff(&mut self) {
        let pruned = self.prune(&mut |diff: &mut Diff| {
            if diff.is_numeric_type_diff() {
                diff.divergence = None;
            }
        });
        debug!(pruned, "ignored numeric type differences");
    }

    /// Drops numeric value diffs whose operands are at most `tolerance` apart,
    /// then prunes every child that became equal.
    pub fn ignore_numeric_value_diff(&mut self, tolerance: f64) {
        let pruned = self.prune(&mut |diff: &mut Diff| {
            let within = match &diff.divergence {
                Some(Divergence::Value { left, right }) if left.is_numeric() => left
                    .numeric_distance(right)
                    .is_some_and(|distance| distance <= tolerance),
                _ => false,
            };
            if within {
                diff.divergence = None;
            }
        });
        debug!(pruned, tolerance, "ignored numeric value differences");
    }

    // Bottom-up: children are cleared and rebuilt before the node itself is visited.
    fn prune(&mut self, clear: &mut dyn FnMut(&mut Diff)) -> usize {
        let mut pruned = 0;
        let children = std::mem::take(&mut self.children);
        for (key, mut child) in children {
            pruned += child.prune(clear);
            if child.is_equal() {
                pruned += 1;
            } else {
                self.children.insert(key, child);
            }
        }
        clear(self);
        pruned
    }

    /// Collapses nested children into one level keyed by composite paths.
    ///
    /// Afterwards no child has children of its own.
    pub fn flatten(&mut self) {
        let children = std::mem::take(&mut self.children);
        for (key, mut child) in children {
            child.flatten();
            if child.children.is_empty() {
                self.children.insert(key, child);
                continue;
            }
            let prefix = key.into_segments();
            for (child_key, grandchild) in std::mem::take(&mut child.children) {
                let mut segments = prefix.clone();
                segments.extend(child_key.into_segments());
                self.children.insert(Key::Path(segments), grandchild);
            }
        }
    }
}
