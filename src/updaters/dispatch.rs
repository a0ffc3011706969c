//! The `get_compat_file` dispatch table
//!
//! The function has the shape
//!
//! ```text
//! let get_compat_file = function
//!   | "8.13" -> "Coq.Compat.Coq813"
//!   | "8.12" -> "Coq.Compat.Coq812"
//!   | ("8.11" | "8.10") as s ->
//! ```
//!
//! followed by hand-written code. The table is parsed into an explicit list
//! of cases and invalid versions, rebuilt from the window, and only its line
//! span is replaced.

use std::path::Path;

use regex::Regex;

use crate::domain::{CompatVersion, VersionWindow};
use crate::error::{Result, UpdateCompatError};
use crate::sync::{Artifact, Synchronizer};

/// Opening line of the dispatch function
pub const OPENING_LINE: &str = "let get_compat_file = function";

const CASE_PATTERN: &str = r#"^  \| "([0-9.]*)" -> "Coq\.Compat\.Coq[0-9]*"$"#;
const CATCH_ALL_PATTERN: &str = r#"^  \| \(([0-9 ".|]*)\) as s ->$"#;

/// A parsed dispatch table and its position in the file
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchTable {
    /// Index of the opening line
    start: usize,
    /// Index of the catch-all line
    end: usize,
    opening: String,
    /// Version literals of the case lines, in file order
    cases: Vec<String>,
    /// Version literals listed by the catch-all
    invalid: Vec<String>,
}

impl DispatchTable {
    /// Locate and parse the table in `contents`
    ///
    /// # Arguments
    /// * `path` - File name used in errors
    /// * `contents` - Full file contents
    ///
    /// # Returns
    /// * `Ok(DispatchTable)` - Parsed table
    /// * `Err` - No opening line, an unrecognized line inside the table, or no catch-all
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let case_re = Regex::new(CASE_PATTERN)?;
        let catch_all_re = Regex::new(CATCH_ALL_PATTERN)?;
        let literal_re = Regex::new(r#""([0-9.]+)""#)?;

        let lines: Vec<&str> = contents.split('\n').collect();
        let start = lines
            .iter()
            .position(|line| line.contains(OPENING_LINE))
            .ok_or_else(|| {
                UpdateCompatError::structure(path, format!("no line '{}'", OPENING_LINE))
            })?;

        let mut cases = Vec::new();
        for (index, line) in lines.iter().enumerate().skip(start + 1) {
            if let Some(captures) = catch_all_re.captures(line) {
                let invalid = literal_re
                    .captures_iter(&captures[1])
                    .map(|c| c[1].to_string())
                    .collect();
                return Ok(DispatchTable {
                    start,
                    end: index,
                    opening: lines[start].to_string(),
                    cases,
                    invalid,
                });
            }
            match case_re.captures(line) {
                Some(captures) => cases.push(captures[1].to_string()),
                None => {
                    return Err(UpdateCompatError::structure(
                        path,
                        format!(
                            "line {} is neither a version case nor a list of invalid \
                             versions (line was {:?})",
                            index + 1,
                            line
                        ),
                    ))
                }
            }
        }

        Err(UpdateCompatError::structure(
            path,
            "get_compat_file ends without a list of invalid versions",
        ))
    }

    /// Versions currently dispatched to a shim
    pub fn cases(&self) -> &[String] {
        &self.cases
    }

    /// Versions currently rejected by the catch-all
    pub fn invalid(&self) -> &[String] {
        &self.invalid
    }

    /// The table for `window`
    ///
    /// Every version literal of this table not in the window moves to the
    /// catch-all, in first-seen order.
    pub fn for_window(&self, window: &VersionWindow) -> Self {
        let retained: Vec<String> = window.versions().iter().map(|v| v.dotted()).collect();

        let mut invalid: Vec<String> = Vec::new();
        for literal in self.cases.iter().chain(self.invalid.iter()) {
            if !retained.contains(literal) && !invalid.contains(literal) {
                invalid.push(literal.clone());
            }
        }

        DispatchTable {
            start: self.start,
            end: self.end,
            opening: self.opening.clone(),
            cases: retained.into_iter().rev().collect(),
            invalid,
        }
    }

    /// Text of the table, one entry per line
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![self.opening.clone()];
        for literal in &self.cases {
            lines.push(case_line(literal));
        }
        let invalid = self
            .invalid
            .iter()
            .map(|v| format!("\"{}\"", v))
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(format!("  | ({}) as s ->", invalid));
        lines
    }

    /// `contents` with this table's span replaced by the rendered table
    pub fn splice(&self, contents: &str) -> String {
        let lines: Vec<&str> = contents.split('\n').collect();
        let mut out: Vec<String> = lines[..self.start].iter().map(|l| l.to_string()).collect();
        out.extend(self.render_lines());
        out.extend(lines[self.end + 1..].iter().map(|l| l.to_string()));
        out.join("\n")
    }
}

fn case_line(literal: &str) -> String {
    let module = CompatVersion::parse(literal)
        .map(|v| v.shim_module())
        .unwrap_or_else(|_| format!("Coq.Compat.Coq{}", literal.replace('.', "")));
    format!("  | \"{}\" -> \"{}\"", literal, module)
}

/// Rewrite the dispatch table in `contents` for `window`
pub fn update_dispatch_contents(
    path: &Path,
    contents: &str,
    window: &VersionWindow,
) -> Result<String> {
    let table = DispatchTable::parse(path, contents)?;
    Ok(table.for_window(window).splice(contents))
}

/// Synchronize the dispatch table in `path`
pub fn update_dispatch(
    sync: &mut Synchronizer,
    path: &Path,
    window: &VersionWindow,
) -> Result<()> {
    let contents = sync.read(path)?.ok_or_else(|| {
        UpdateCompatError::structure(path, format!("file with a line '{}'", OPENING_LINE))
    })?;
    let desired = update_dispatch_contents(path, &contents, window)?;
    sync.apply(&Artifact::new(path, Some(contents), desired))?;
    Ok(())
}
