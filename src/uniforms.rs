//! Static uniform extraction.
//!
//! This is pattern matching over text, not parsing: it is not scope-aware, does not
//! split `uniform float a, b;`, and takes the last two whitespace-separated tokens of
//! each block member as its type and name. Anything it does not recognize is skipped.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FLAT_UNIFORM_RE: Regex =
        Regex::new(r"(?m)^\s*(layout\s*\([^)]+\)\s+)?uniform\s+(\w+)\s+(\w+)\s*;").unwrap();
    static ref UNIFORM_BLOCK_RE: Regex =
        Regex::new(r"(?m)^\s*(layout\s*\([^)]+\)\s+)?uniform\s+(\w+)\s*\{([^}]+)\};").unwrap();
}

/// A declared uniform, either standalone or a member of a uniform block.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Uniform {
    /// GLSL type name, e.g. `vec4`
    pub ty: String,
    pub name: String,

    /// Name of the enclosing uniform block, if any
    pub container_block: Option<String>,
}

impl Uniform {
    pub fn is_block_member(&self) -> bool {
        self.container_block.is_some()
    }
}

/// Extracts uniforms from (flattened) shader source.
///
/// All standalone uniforms come first in source order, followed by the members of
/// every uniform block, block by block.
pub fn extract_uniforms(source: &str) -> Vec<Uniform> {
    let mut uniforms: Vec<Uniform> = FLAT_UNIFORM_RE
        .captures_iter(source)
        .map(|captures| Uniform {
            ty: captures[2].to_owned(),
            name: captures[3].to_owned(),
            container_block: None,
        })
        .collect();

    for captures in UNIFORM_BLOCK_RE.captures_iter(source) {
        let block_name = &captures[2];
        uniforms.extend(block_members(&captures[3]).map(|(ty, name)| Uniform {
            ty: ty.to_owned(),
            name: name.to_owned(),
            container_block: Some(block_name.to_owned()),
        }));
    }

    uniforms
}

fn block_members(body: &str) -> impl Iterator<Item = (&str, &str)> {
    body.split(';').filter_map(|fragment| {
        let fragment = fragment.trim();
        if fragment.is_empty() || fragment.starts_with("//") {
            return None;
        }

        let tokens: Vec<&str> = fragment.split_whitespace().collect();
        match tokens[..] {
            [.., ty, name] => Some((ty, name)),
            _ => None,
        }
    })
}
