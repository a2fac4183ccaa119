//! **shader-audit** is a small toolchain for GLSL shader sources: it flattens `#include`
//! directives into a single compilable source, statically extracts declared uniforms,
//! classifies the members of `std140` uniform blocks for refactoring audits, and runs an
//! external validator (`glslangValidator`) against the flattened result, attaching source
//! context to the errors it reports.
//!
//! This crate does not implement a C-like preprocessor. Only lines of the exact form
//! `#include "path"` are expanded; every other directive is copied through untouched.
//!
//! Expansion never fails. Missing and circular includes are replaced by sentinel comment
//! lines, so the validator still gets a source it can report on:
//!
//! ```text
//! // >>> INCLUDE START: common/noise.glsl
//! ...
//! // SKIPPED CIRCULAR INCLUDE: common/../main.fsh
//! // <<< INCLUDE END: common/noise.glsl
//! ```
//!
//! Line numbers in the flattened source do not match those of any single input file;
//! diagnostic context is always shown against the flattened text.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use shader_audit::{extract_uniforms, process_file, FileIncludeProvider, ResolveOptions};
//!
//! let flattened = process_file(
//!     "shaders/post/field_visual.fsh",
//!     &mut FileIncludeProvider,
//!     PathBuf::new(),
//!     &ResolveOptions::default(),
//! );
//!
//! for uniform in extract_uniforms(&flattened.to_string()) {
//!     println!("{} {}", uniform.ty, uniform.name);
//! }
//! ```

mod error;
mod include_provider;
mod scanner;
mod source_line;

pub mod console;
pub mod diagnostics;
pub mod report;
pub mod ubo_block;
pub mod uniforms;
pub mod validator;


use std::collections::HashSet;

pub use error::*;
pub use include_provider::*;
pub use scanner::{parse_include_directive, ResolveOptions};
pub use source_line::*;

pub use diagnostics::{annotate, AnnotatedReport, Severity};
pub use ubo_block::{classify_block, BlockParameter, ClassifiedBlock, Domain, UpdateFrequency};
pub use uniforms::{extract_uniforms, Uniform};

use scanner::Scanner;

/// Flatten a single file, and then any code recursively referenced.
///
/// `include_provider` is used to read all of the files, including the one at `file_path`,
/// which is resolved against `include_context`.
///
/// The include guard lives only for the duration of this call.
pub fn process_file<IncludeContext>(
    file_path: &str,
    include_provider: &mut dyn IncludeProvider<IncludeContext = IncludeContext>,
    include_context: IncludeContext,
    options: &ResolveOptions,
) -> FlattenedSource {
    let mut prior_includes = HashSet::new();
    let mut scanner = Scanner::new(
        "",
        &mut prior_includes,
        include_provider,
        include_context,
        options,
        0,
    );
    scanner.include_child(file_path)
}
