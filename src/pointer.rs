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


use std::fmt;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::value::JsonValue;

/// An RFC 6901 pointer such as `/extruders/0/feedrate`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    pub fn new(path: &str) -> Result<Self, Diagnostic> {
        if path.is_empty() {
            return Ok(JsonPointer { tokens: vec![] });
        }

        if !path.starts_with('/') {
            return Err(Diagnostic::fatal(
                DiagnosticCode::InvalidPointerSyntax,
                format!(
                    "I couldn't parse the path '{}': Path must start with '/'",
                    path
                ),
            ));
        }

        let tokens = path[1..]
            .split('/')
            .map(|token| token.replace("~1", "/").replace("~0", "~"))
            .collect();

        Ok(JsonPointer { tokens })
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get<'a>(&self, value: &'a JsonValue) -> Result<&'a JsonValue, Diagnostic> {
        let mut current = value;
        for token in &self.tokens {
            current = step(current, token)?;
        }
        Ok(current)
    }

    fn parent_mut<'a>(&self, value: &'a mut JsonValue) -> Result<&'a mut JsonValue, Diagnostic> {
        let mut current = value;
        for token in &self.tokens[..self.tokens.len().saturating_sub(1)] {
            current = step_mut(current, token)?;
        }
        Ok(current)
    }

    /// Inserts into an object, replaces an array element, or appends when the
    /// index equals the array length.
    pub fn set(&self, value: &mut JsonValue, new_value: JsonValue) -> Result<(), Diagnostic> {
        let Some(last_token) = self.tokens.last() else {
            *value = new_value;
            return Ok(());
        };

        match self.parent_mut(value)? {
            JsonValue::Object(obj) => {
                obj.insert(last_token.clone(), new_value);
            }
            JsonValue::Array(arr) => {
                let index = parse_index(last_token)?;
                if index == arr.len() {
                    arr.push(new_value);
                } else if index < arr.len() {
                    arr[index] = new_value;
                } else {
                    return Err(Diagnostic::fatal(
                        DiagnosticCode::PointerTargetNotFound,
                        format!(
                            "I couldn't set index {} (array length is {})",
                            index,
                            arr.len()
                        ),
                    ));
                }
            }
            other => {
                return Err(Diagnostic::fatal(
                    DiagnosticCode::TypeMismatch,
                    format!("I can't set property '{}' on {}", last_token, other.kind()),
                ));
            }
        }

        Ok(())
    }

    pub fn remove(&self, value: &mut JsonValue) -> Result<JsonValue, Diagnostic> {
        let Some(last_token) = self.tokens.last() else {
            return Err(Diagnostic::fatal(
                DiagnosticCode::InvalidPointerSyntax,
                "I can't remove the root value".to_string(),
            ));
        };

        match self.parent_mut(value)? {
            JsonValue::Object(obj) => obj.remove(last_token).ok_or_else(|| {
                Diagnostic::fatal(
                    DiagnosticCode::PointerTargetNotFound,
                    format!("I couldn't find the key '{}' to remove", last_token),
                )
            }),
            JsonValue::Array(arr) => {
                let index = parse_index(last_token)?;
                if index < arr.len() {
                    Ok(arr.remove(index))
                } else {
                    Err(Diagnostic::fatal(
                        DiagnosticCode::PointerTargetNotFound,
                        format!(
                            "I couldn't remove index {} (array length is {})",
                            index,
                            arr.len()
                        ),
                    ))
                }
            }
            other => Err(Diagnostic::fatal(
                DiagnosticCode::TypeMismatch,
                format!(
                    "I can't remove property '{}' from {}",
                    last_token,
                    other.kind()
                ),
            )),
        }
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", token.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

fn parse_index(token: &str) -> Result<usize, Diagnostic> {
    token.parse::<usize>().map_err(|_| {
        Diagnostic::fatal(
            DiagnosticCode::InvalidArrayIndex,
            format!("I couldn't parse '{}' as an array index", token),
        )
    })
}

fn not_found(token: &str, current: &JsonValue) -> Diagnostic {
    match current {
        JsonValue::Array(arr) => Diagnostic::fatal(
            DiagnosticCode::PointerTargetNotFound,
            format!(
                "I couldn't find index {} (array length is {})",
                token,
                arr.len()
            ),
        ),
        _ => Diagnostic::fatal(
            DiagnosticCode::PointerTargetNotFound,
            format!("I couldn't find the key '{}'", token),
        ),
    }
}

fn cannot_index(token: &str, current: &JsonValue) -> Diagnostic {
    Diagnostic::fatal(
        DiagnosticCode::TypeMismatch,
        format!("I can't index into {} with '{}'", current.kind(), token),
    )
}

fn step<'a>(current: &'a JsonValue, token: &str) -> Result<&'a JsonValue, Diagnostic> {
    match current {
        JsonValue::Object(obj) => obj.get(token).ok_or_else(|| not_found(token, current)),
        JsonValue::Array(arr) => {
            let index = parse_index(token)?;
            arr.get(index).ok_or_else(|| not_found(token, current))
        }
        _ => Err(cannot_index(token, current)),
    }
}

fn step_mut<'a>(current: &'a mut JsonValue, token: &str) -> Result<&'a mut JsonValue, Diagnostic> {
    match current {
        JsonValue::Object(obj) => obj.get_mut(token).ok_or_else(|| {
            Diagnostic::fatal(
                DiagnosticCode::PointerTargetNotFound,
                format!("I couldn't find the key '{}'", token),
            )
        }),
        JsonValue::Array(arr) => {
            let index = parse_index(token)?;
            let array_len = arr.len();
            arr.get_mut(index).ok_or_else(|| {
                Diagnostic::fatal(
                    DiagnosticCode::PointerTargetNotFound,
                    format!(
                        "I couldn't find index {} (array length is {})",
                        index, array_len
                    ),
                )
            })
        }
        other => Err(cannot_index(token, other)),
    }
}
