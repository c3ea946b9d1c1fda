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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Fatal,
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Fatal => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticCode {
    PathNotFound,
    InvalidUtf8,
    InvalidJson,
    MissingInput,

    InvalidPointerSyntax,
    PointerTargetNotFound,
    InvalidArrayIndex,
    TypeMismatch,
    InvalidEditSyntax,

    MaxDepthExceeded,

    InvalidOption,
    RedundantOption,
    OutputWriteFailed,
    SerializationFailed,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::PathNotFound => "E001",
            DiagnosticCode::InvalidUtf8 => "E002",
            DiagnosticCode::InvalidJson => "E003",
            DiagnosticCode::MissingInput => "E004",

            DiagnosticCode::InvalidPointerSyntax => "E010",
            DiagnosticCode::PointerTargetNotFound => "E011",
            DiagnosticCode::InvalidArrayIndex => "E012",
            DiagnosticCode::TypeMismatch => "E013",
            DiagnosticCode::InvalidEditSyntax => "E014",

            DiagnosticCode::MaxDepthExceeded => "E020",

            DiagnosticCode::InvalidOption => "E030",
            DiagnosticCode::RedundantOption => "W031",
            DiagnosticCode::OutputWriteFailed => "E032",
            DiagnosticCode::SerializationFailed => "E033",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DiagnosticCode::PathNotFound => "Path not found",
            DiagnosticCode::InvalidUtf8 => "Invalid UTF-8 encoding",
            DiagnosticCode::InvalidJson => "Invalid JSON",
            DiagnosticCode::MissingInput => "Missing input",

            DiagnosticCode::InvalidPointerSyntax => "Invalid JSON Pointer syntax",
            DiagnosticCode::PointerTargetNotFound => "Pointer target not found",
            DiagnosticCode::InvalidArrayIndex => "Invalid array index",
            DiagnosticCode::TypeMismatch => "Type mismatch",
            DiagnosticCode::InvalidEditSyntax => "Invalid edit syntax",

            DiagnosticCode::MaxDepthExceeded => "Exceeded maximum depth",

            DiagnosticCode::InvalidOption => "Invalid option value",
            DiagnosticCode::RedundantOption => "Redundant option",
            DiagnosticCode::OutputWriteFailed => "Could not write output",
            DiagnosticCode::SerializationFailed => "Serialization failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub filename: Option<String>,
    pub line_number: Option<usize>,
    pub column: Option<usize>,
    pub level: DiagnosticLevel,
    pub code: DiagnosticCode,
    pub description: String,
    pub code_snippet: Option<String>,
    pub advice: Option<String>,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, code: DiagnosticCode, description: String) -> Self {
        Self {
            filename: None,
            line_number: None,
            column: None,
            level,
            code,
            description,
            code_snippet: None,
            advice: None,
        }
    }

    pub fn fatal(code: DiagnosticCode, description: String) -> Self {
        Self::new(DiagnosticLevel::Fatal, code, description)
    }

    pub fn with_location(mut self, filename: String, line_number: usize) -> Self {
        self.filename = Some(filename);
        self.line_number = Some(line_number);
        self
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_snippet(mut self, snippet: String) -> Self {
        self.code_snippet = Some(snippet);
        self
    }

    pub fn with_advice(mut self, advice: String) -> Self {
        self.advice = Some(advice);
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.level == DiagnosticLevel::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(filename), Some(line)) = (&self.filename, self.line_number) {
            if let Some(col) = self.column {
                write!(f, "{}:{}:{} - ", filename, line, col)?;
            } else {
                write!(f, "{}:{} - ", filename, line)?;
            }
        }

        writeln!(
            f,
            "{} {}: {}",
            self.level,
            self.code.as_str(),
            self.code.title()
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;

        if let Some(snippet) = &self.code_snippet {
            writeln!(f)?;
            writeln!(f, "{}", snippet)?;
        }

        if let Some(advice) = &self.advice {
            writeln!(f)?;
            writeln!(f, "{}", advice)?;
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_fatal())
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_location_and_advice() {
        let diagnostic = Diagnostic::fatal(
            DiagnosticCode::InvalidJson,
            "I couldn't parse this file as JSON: trailing comma".to_string(),
        )
        .with_location("left.json".to_string(), 3)
        .with_column(14)
        .with_snippet("    3 |   \"a\": 1,}".to_string())
        .with_advice("Remove the trailing comma.".to_string());

        let text = diagnostic.to_string();
        assert!(text.starts_with("left.json:3:14 - error E003: Invalid JSON\n"));
        assert!(text.contains("\"a\": 1,}"));
        assert!(text.ends_with("Remove the trailing comma.\n"));
    }

    #[test]
    fn test_collector_tracks_fatal() {
        let mut collector = DiagnosticCollector::new();
        assert!(collector.is_empty());

        collector.add(Diagnostic::new(
            DiagnosticLevel::Warning,
            DiagnosticCode::RedundantOption,
            "--flatten has no effect".to_string(),
        ));
        assert!(!collector.has_fatal());

        collector.add(Diagnostic::fatal(
            DiagnosticCode::MissingInput,
            "no right-hand input".to_string(),
        ));
        assert!(collector.has_fatal());
        assert_eq!(collector.into_diagnostics().len(), 2);
    }
}
