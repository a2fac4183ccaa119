use std::fmt;

/// One line of flattened output: either shader code copied from a file,
/// or a synthetic marker comment inserted by the resolver.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SourceLine {
    /// Verbatim source text, including its line terminator (if it had one)
    Code(String),

    /// Opens the expansion of an `#include`; holds the path as spelled
    IncludeStart(String),

    /// Closes the expansion of an `#include`; holds the path as spelled
    IncludeEnd(String),

    /// An include that would re-enter a file already being expanded
    CircularInclude(String),

    /// An include that could not be resolved or read
    MissingInclude(String),

    /// An include skipped because the configured depth limit was reached
    DepthLimit { path: String, max_depth: usize },
}

impl SourceLine {
    pub fn is_marker(&self) -> bool {
        !matches!(self, SourceLine::Code(_))
    }
}

impl fmt::Display for SourceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLine::Code(text) => f.write_str(text),
            SourceLine::IncludeStart(path) => writeln!(f, "// >>> INCLUDE START: {}", path),
            SourceLine::IncludeEnd(path) => writeln!(f, "// <<< INCLUDE END: {}", path),
            SourceLine::CircularInclude(path) => {
                writeln!(f, "// SKIPPED CIRCULAR INCLUDE: {}", path)
            }
            SourceLine::MissingInclude(path) => writeln!(f, "// ERROR: FILE NOT FOUND {}", path),
            SourceLine::DepthLimit { path, max_depth } => {
                writeln!(f, "// SKIPPED INCLUDE (MAX DEPTH {}): {}", max_depth, path)
            }
        }
    }
}

/// The include-expanded shader, one entry per output line.
///
/// Line numbers in here do not correspond to line numbers of any single input file.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct FlattenedSource {
    pub lines: Vec<SourceLine>,
}

impl FlattenedSource {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// 1-based line lookup, without the terminator.
    pub fn line_text(&self, line: usize) -> Option<String> {
        let idx = line.checked_sub(1)?;
        self.lines.get(idx).map(|l| {
            let text = l.to_string();
            text.trim_end_matches(['\n', '\r']).to_owned()
        })
    }

    pub(crate) fn push(&mut self, line: SourceLine) {
        self.lines.push(line);
    }

    /// Appends the expansion of a child file, making sure whatever follows
    /// starts on a fresh line.
    pub(crate) fn append_child(&mut self, mut child: FlattenedSource) {
        if let Some(SourceLine::Code(last)) = child.lines.last_mut() {
            if !last.ends_with('\n') {
                last.push('\n');
            }
        }
        self.lines.append(&mut child.lines);
    }
}

impl fmt::Display for FlattenedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}
