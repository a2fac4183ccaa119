//! Validator log handling.
//!
//! `glslangValidator` reports errors against the file it was given, which here is the
//! flattened source. This module classifies its log lines and, for errors carrying a
//! line number, attaches a few lines of the flattened source around that line.
//!
//! A typical error line looks like `ERROR: 0:12: 'foo' : undeclared identifier`, where
//! the field after the string index is the line number.

use std::fmt;

use crate::console::{paint, Tint};
use crate::FlattenedSource;

const ERROR_MARKER: &str = "ERROR:";
const WARNING_MARKER: &str = "WARNING:";

/// Lines shown before and after the offending line.
const CONTEXT_BEFORE: usize = 2;
const CONTEXT_AFTER: usize = 1;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn of_line(line: &str) -> Severity {
        if line.contains(ERROR_MARKER) {
            Severity::Error
        } else if line.contains(WARNING_MARKER) {
            Severity::Warning
        } else {
            Severity::Info
        }
    }
}

/// Output of the external compiler.
#[derive(Clone, Debug)]
pub struct ShaderCompilerOutput {
    /// Whether the compiler exited successfully
    pub success: bool,
    pub log: String,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ContextLine {
    /// 1-based line number in the flattened source
    pub number: usize,
    pub text: String,
    pub is_target: bool,
}

/// Lines of flattened source surrounding a reported error.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ContextWindow {
    pub line: usize,
    pub lines: Vec<ContextLine>,
}

impl ContextWindow {
    /// Same text as `Display`, with the heading and the offending line tinted for a terminal.
    pub fn tinted(&self) -> TintedContext<'_> {
        TintedContext(self)
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, tinted: bool) -> fmt::Result {
        let heading = format!("   -> Context around line {}:", self.line);
        if tinted {
            writeln!(f, "{}", paint(Tint::Yellow, heading))?;
        } else {
            writeln!(f, "{}", heading)?;
        }

        for line in &self.lines {
            let marker = if line.is_target { ">>" } else { "  " };
            let text = format!("{}: {}", line.number, line.text);
            if tinted && line.is_target {
                writeln!(f, "   {} {}", marker, paint(Tint::Red, text))?;
            } else {
                writeln!(f, "   {} {}", marker, text)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ContextWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

pub struct TintedContext<'a>(&'a ContextWindow);

impl fmt::Display for TintedContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f, true)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ReportEntry {
    pub text: String,
    pub severity: Severity,
    pub context: Option<ContextWindow>,
}

/// Every diagnostic line, in order, with context attached to the errors that have a
/// usable line number.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct AnnotatedReport {
    pub entries: Vec<ReportEntry>,
}

impl AnnotatedReport {
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.severity == Severity::Error)
            .count()
    }

    pub fn contexts(&self) -> impl Iterator<Item = &ContextWindow> {
        self.entries.iter().filter_map(|e| e.context.as_ref())
    }
}

impl fmt::Display for AnnotatedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry.text)?;
            if let Some(context) = &entry.context {
                write!(f, "{}", context)?;
            }
        }
        Ok(())
    }
}

/// Extracts the line number from an `ERROR:` line: the second `:`-separated field
/// after the marker.
pub fn error_line_number(line: &str) -> Option<usize> {
    let (_, rest) = line.split_once(ERROR_MARKER)?;
    let field = rest.split(':').nth(1)?;
    field.trim().parse::<usize>().ok()
}

/// Lines `line - 2 ..= line + 1` of `source`, clamped to its bounds.
pub fn context_window(source: &FlattenedSource, line: usize) -> Option<ContextWindow> {
    if line == 0 || line > source.line_count() {
        return None;
    }

    let first = line.saturating_sub(CONTEXT_BEFORE).max(1);
    let last = (line + CONTEXT_AFTER).min(source.line_count());

    let lines = (first..=last)
        .filter_map(|number| {
            source.line_text(number).map(|text| ContextLine {
                number,
                text,
                is_target: number == line,
            })
        })
        .collect();

    Some(ContextWindow { line, lines })
}

/// Pairs the validator's diagnostics with the flattened source they refer to.
///
/// No line is dropped; lines without a parseable line number are kept verbatim.
pub fn annotate(source: &FlattenedSource, diagnostics: &str) -> AnnotatedReport {
    let entries = diagnostics
        .lines()
        .map(|line| {
            let severity = Severity::of_line(line);
            let context = match severity {
                Severity::Error => {
                    error_line_number(line).and_then(|number| context_window(source, number))
                }
                _ => None,
            };

            ReportEntry {
                text: line.to_owned(),
                severity,
                context,
            }
        })
        .collect();

    AnnotatedReport { entries }
}

/// Replaces mentions of the scratch file with the shader's own name.
pub fn rename_scratch_references(line: &str, scratch_name: &str, shader_name: &str) -> String {
    if !scratch_name.is_empty() && line.contains(scratch_name) {
        line.replace(scratch_name, &format!("{} (Preprocessed)", shader_name))
    } else {
        line.to_owned()
    }
}
