//! Line-oriented `#include` expansion.
//!
//! Any include that cannot be read is replaced by the `// ERROR: FILE NOT FOUND` sentinel,
//! even when the file exists but is not valid UTF-8. The actual error is logged at `warn`.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{FlattenedSource, IncludeProvider, ResolvedInclude, ResolvedIncludePath, SourceLine};

lazy_static! {
    static ref INCLUDE_RE: Regex = Regex::new(r#"^\s*#include\s+"([^"]+)""#).unwrap();
}

/// Knobs for a single resolve pass.
#[derive(Clone, Debug, Default)]
pub struct ResolveOptions {
    /// Maximum include nesting below the root file. `None` means unbounded;
    /// the cycle guard alone keeps recursion finite.
    pub max_depth: Option<usize>,
}

/// Returns the include path if `line` is an `#include "..."` directive.
pub fn parse_include_directive(line: &str) -> Option<&str> {
    INCLUDE_RE
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

pub(crate) struct Scanner<'a, 'b, 'c, IncludeContext> {
    include_provider: &'b mut dyn IncludeProvider<IncludeContext = IncludeContext>,
    include_context: IncludeContext,
    input: &'a str,
    prior_includes: &'c mut HashSet<ResolvedIncludePath>,
    options: &'c ResolveOptions,
    // Number of files open on the include stack, this one included
    depth: usize,
    output: FlattenedSource,
}

impl<'a, 'b, 'c, IncludeContext> Scanner<'a, 'b, 'c, IncludeContext> {
    pub fn new(
        input: &'a str,
        prior_includes: &'c mut HashSet<ResolvedIncludePath>,
        include_provider: &'b mut dyn IncludeProvider<IncludeContext = IncludeContext>,
        include_context: IncludeContext,
        options: &'c ResolveOptions,
        depth: usize,
    ) -> Scanner<'a, 'b, 'c, IncludeContext> {
        Scanner {
            include_provider,
            include_context,
            input,
            prior_includes,
            options,
            depth,
            output: FlattenedSource::default(),
        }
    }

    pub fn into_output(self) -> FlattenedSource {
        self.output
    }

    /// Resolves `path` against this scanner's context and returns its expansion,
    /// or a single sentinel line if it cannot be expanded.
    pub fn include_child(&mut self, path: &str) -> FlattenedSource {
        let resolved = match self
            .include_provider
            .resolve_path(path, &self.include_context)
        {
            Ok(resolved) => resolved,
            Err(err) => {
                log::warn!("Include file not found: {} ({})", path, err);
                return sentinel(SourceLine::MissingInclude(path.to_owned()));
            }
        };

        let ResolvedInclude {
            resolved_path,
            display_path,
            context,
        } = resolved;

        if self.prior_includes.contains(&resolved_path) {
            log::debug!("Skipping circular include: {}", display_path);
            return sentinel(SourceLine::CircularInclude(display_path));
        }

        if let Some(max_depth) = self.options.max_depth {
            if self.depth > max_depth {
                log::warn!(
                    "Include depth limit ({}) reached at {}",
                    max_depth,
                    display_path
                );
                return sentinel(SourceLine::DepthLimit {
                    path: display_path,
                    max_depth,
                });
            }
        }

        let indent = "  ".repeat(self.depth);

        let child_code = match self.include_provider.get_include(&resolved_path) {
            Ok(code) => code,
            Err(err) => {
                log::warn!(
                    "{}Cannot read include file {}: {}",
                    indent,
                    display_path,
                    err
                );
                return sentinel(SourceLine::MissingInclude(display_path));
            }
        };

        log::info!("{}Processing: {}", indent, file_name(&display_path));

        self.prior_includes.insert(resolved_path.clone());

        let child = {
            let mut child_scanner = Scanner::new(
                &child_code,
                self.prior_includes,
                self.include_provider,
                context,
                self.options,
                self.depth + 1,
            );
            child_scanner.process_input();
            child_scanner.into_output()
        };

        self.prior_includes.remove(&resolved_path);

        child
    }

    pub fn process_input(&mut self) {
        for line in self.input.split_inclusive('\n') {
            if let Some(path) = parse_include_directive(line) {
                let child = self.include_child(path);

                self.output.push(SourceLine::IncludeStart(path.to_owned()));
                self.output.append_child(child);
                self.output.push(SourceLine::IncludeEnd(path.to_owned()));
            } else {
                self.output.push(SourceLine::Code(line.to_owned()));
            }
        }
    }
}

fn sentinel(line: SourceLine) -> FlattenedSource {
    FlattenedSource { lines: vec![line] }
}

fn file_name(path: &str) -> &str {
    std::path::Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
