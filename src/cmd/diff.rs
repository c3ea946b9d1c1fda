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


use crate::flags;
use json_treediff::{
    compare, Diagnostic, DiagnosticCode, DiagnosticLevel, DiffReport, JsonValue, RenderOptions,
    Transform,
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Text,
    Json,
}

pub fn run(flags: &flags::Diff) -> Vec<Diagnostic> {
    let transform = match Transform::from_options(&flags.set, &flags.remove) {
        Ok(transform) => transform,
        Err(diagnostics) => return diagnostics,
    };

    let mut diagnostics = Vec::new();
    if let Err(diagnostic) = execute(flags, &transform, &mut diagnostics) {
        diagnostics.push(diagnostic);
    }
    diagnostics
}

fn execute(
    flags: &flags::Diff,
    transform: &Transform,
    warnings: &mut Vec<Diagnostic>,
) -> Result<(), Diagnostic> {
    let format = parse_format(flags.format.as_deref())?;

    if let Some(tolerance) = flags.tolerance {
        // Also rejects NaN
        if !(tolerance >= 0.0) {
            return Err(Diagnostic::fatal(
                DiagnosticCode::InvalidOption,
                format!("I can't use {} as a tolerance; it must be zero or positive.", tolerance),
            ));
        }
    }

    if format == ReportFormat::Json && flags.flatten {
        warnings.push(Diagnostic::new(
            DiagnosticLevel::Warning,
            DiagnosticCode::RedundantOption,
            "The JSON report is always flat, so --flatten has no effect.".to_string(),
        ));
    }

    if flags.right.is_none() && transform.is_empty() {
        return Err(Diagnostic::fatal(
            DiagnosticCode::MissingInput,
            "I need something to compare the left file against, but you gave neither a right file nor any edits.".to_string(),
        )
        .with_advice(
            "Usage: json-treediff <left.json> <right.json>\n   or: json-treediff <left.json> --set /path=<json> --remove /path"
                .to_string(),
        ));
    }

    let left = load_json(&flags.left)?;
    let right = match &flags.right {
        Some(path) => load_json(path)?,
        None => left.clone(),
    };
    let right = transform.apply(&right)?;
    info!(
        left = %flags.left.display(),
        edits = transform.len(),
        "comparing configuration trees"
    );

    let mut diff = compare(&left, &right)?;
    if flags.ignore_numeric_types {
        diff.ignore_numeric_type_diff();
    }
    if let Some(tolerance) = flags.tolerance {
        diff.ignore_numeric_value_diff(tolerance);
    }

    let report = match format {
        ReportFormat::Text => {
            if flags.flatten {
                diff.flatten();
            }
            let defaults = RenderOptions::default();
            let options = RenderOptions {
                indent_size: flags.indent.unwrap_or(defaults.indent_size),
                trim_size: flags.trim.unwrap_or(defaults.trim_size),
            };
            diff.render(&options)
        }
        ReportFormat::Json => DiffReport::from_diff(&diff).to_json_pretty()?,
    };

    match &flags.output {
        Some(path) => {
            fs::write(path, format!("{}\n", report)).map_err(|e| {
                Diagnostic::fatal(
                    DiagnosticCode::OutputWriteFailed,
                    format!("I couldn't write the report to {}: {}", path.display(), e),
                )
                .with_advice(
                    "Make sure the directory exists and you have write permission.".to_string(),
                )
            })?;
            info!(output = %path.display(), "wrote report");
        }
        None => println!("{}", report),
    }

    Ok(())
}

fn parse_format(format: Option<&str>) -> Result<ReportFormat, Diagnostic> {
    match format {
        None | Some("text") => Ok(ReportFormat::Text),
        Some("json") => Ok(ReportFormat::Json),
        Some(other) => Err(Diagnostic::fatal(
            DiagnosticCode::InvalidOption,
            format!("I don't know the report format '{}'.", other),
        )
        .with_advice("Use --format text or --format json.".to_string())),
    }
}

fn load_json(path: &Path) -> Result<JsonValue, Diagnostic> {
    let filename = path.display().to_string();

    let bytes = fs::read(path).map_err(|e| {
        Diagnostic::fatal(
            DiagnosticCode::PathNotFound,
            format!("I couldn't read the input file {}: {}", filename, e),
        )
        .with_advice(
            "Make sure the file path is correct and the file exists. \
             Check for typos in the filename."
                .to_string(),
        )
    })?;

    let text = String::from_utf8(bytes).map_err(|e| {
        Diagnostic::fatal(
            DiagnosticCode::InvalidUtf8,
            format!(
                "I found invalid UTF-8 bytes at byte offset {}.",
                e.utf8_error().valid_up_to()
            ),
        )
        .with_location(filename.clone(), 1)
        .with_advice("Save the file with UTF-8 encoding.".to_string())
    })?;

    let value: Value = serde_json::from_str(&text).map_err(|e| {
        let mut diagnostic = Diagnostic::fatal(
            DiagnosticCode::InvalidJson,
            format!("I couldn't parse this file as JSON: {}", e),
        )
        .with_location(filename.clone(), e.line())
        .with_column(e.column());
        if let Some(line) = e.line().checked_sub(1).and_then(|i| text.lines().nth(i)) {
            diagnostic = diagnostic.with_snippet(format!("{:>5} | {}", e.line(), line));
        }
        diagnostic.with_advice(
            "Only strict JSON is accepted: no comments, no trailing commas, quoted keys."
                .to_string(),
        )
    })?;

    Ok(JsonValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{NamedTempFile, TempDir};

    fn json_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    fn flags(left: &Path, right: Option<&Path>, output: &Path) -> flags::Diff {
        flags::Diff {
            left: left.to_path_buf(),
            right: right.map(Path::to_path_buf),
            output: Some(output.to_path_buf()),
            format: None,
            indent: None,
            trim: None,
            flatten: false,
            ignore_numeric_types: false,
            tolerance: None,
            set: Vec::new(),
            remove: Vec::new(),
        }
    }

    fn output_path(dir: &TempDir) -> PathBuf {
        dir.path().join("report.txt")
    }

    #[test]
    fn test_text_report_written_to_file() {
        let left = json_file(r#"{"a": 1, "b": {"c": true}}"#);
        let right = json_file(r#"{"a": 1.0, "b": {"c": false}}"#);
        let dir = TempDir::new().unwrap();
        let out = output_path(&dir);

        let mut flags = flags(left.path(), Some(right.path()), &out);
        flags.ignore_numeric_types = true;

        assert!(run(&flags).is_empty());
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "b:\n  .c:\n    ::: true and false do not match\n"
        );
    }

    #[test]
    fn test_identical_files_report_empty() {
        let left = json_file(r#"{"a": [1, 2]}"#);
        let dir = TempDir::new().unwrap();
        let out = output_path(&dir);

        assert!(run(&flags(left.path(), Some(left.path()), &out)).is_empty());
        assert_eq!(fs::read_to_string(&out).unwrap(), "(empty)\n");
    }

    #[test]
    fn test_transform_without_right_file() {
        let left = json_file(r#"{"baseLayer": {"w": 1}, "layerHeight": 0.2, "doRaft": true}"#);
        let dir = TempDir::new().unwrap();
        let out = output_path(&dir);

        let mut flags = flags(left.path(), None, &out);
        flags.set = vec!["/layerHeight=0.4".to_string(), "/doRaft=false".to_string()];
        flags.remove = vec!["/baseLayer".to_string()];
        flags.flatten = true;

        assert!(run(&flags).is_empty());
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "baseLayer:\n  --- {\"w\": 1} was removed\n\
             doRaft:\n  ::: true and false do not match\n\
             layerHeight:\n  ::: 0.2 and 0.4 do not match\n"
        );
    }

    #[test]
    fn test_tolerance_option() {
        let left = json_file(r#"{"feedrate": 40.0, "fan": 0.5}"#);
        let right = json_file(r#"{"feedrate": 40.05, "fan": 1.0}"#);
        let dir = TempDir::new().unwrap();
        let out = output_path(&dir);

        let mut flags = flags(left.path(), Some(right.path()), &out);
        flags.tolerance = Some(0.1);

        assert!(run(&flags).is_empty());
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "fan:\n  ::: 0.5 and 1.0 do not match\n"
        );
    }

    #[test]
    fn test_json_format() {
        let left = json_file(r#"{"a": {"b": 1}}"#);
        let right = json_file(r#"{"a": {"b": "1"}}"#);
        let dir = TempDir::new().unwrap();
        let out = output_path(&dir);

        let mut flags = flags(left.path(), Some(right.path()), &out);
        flags.format = Some("json".to_string());
        flags.flatten = true;

        let diagnostics = run(&flags);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].level, DiagnosticLevel::Warning);

        let value: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["entries"][0]["path"], "a.b");
        assert_eq!(value["entries"][0]["change"], "type");
    }

    #[test]
    fn test_missing_right_side() {
        let left = json_file("{}");
        let dir = TempDir::new().unwrap();

        let diagnostics = run(&flags(left.path(), None, &output_path(&dir)));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::MissingInput);
    }

    #[test]
    fn test_invalid_json_reports_location() {
        let left = json_file("{\n  \"a\": 1,\n}");
        let dir = TempDir::new().unwrap();

        let diagnostics = run(&flags(left.path(), Some(left.path()), &output_path(&dir)));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidJson);
        assert_eq!(diagnostics[0].line_number, Some(3));
        assert!(diagnostics[0].code_snippet.is_some());
    }

    #[test]
    fn test_nonexistent_input() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");

        let diagnostics = run(&flags(&missing, Some(&missing), &output_path(&dir)));
        assert_eq!(diagnostics[0].code, DiagnosticCode::PathNotFound);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let left = json_file("{}");
        let dir = TempDir::new().unwrap();

        let mut flags = flags(left.path(), Some(left.path()), &output_path(&dir));
        flags.tolerance = Some(-1.0);

        let diagnostics = run(&flags);
        assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidOption);
    }

    #[test]
    fn test_bad_edits_all_reported() {
        let left = json_file("{}");
        let dir = TempDir::new().unwrap();

        let mut flags = flags(left.path(), None, &output_path(&dir));
        flags.set = vec!["nopointer=1".to_string(), "/x".to_string()];

        let diagnostics = run(&flags);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(Diagnostic::is_fatal));
    }
}
