use std::path::{Component, Path, PathBuf};

use crate::BoxedIncludeProviderError;

/// Identity of an included file. Two spellings of the same file must resolve
/// to the same `ResolvedIncludePath`, since the include guard is keyed on it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedIncludePath(pub String);

pub struct ResolvedInclude<IncludeContext> {
    pub resolved_path: ResolvedIncludePath,

    /// Human-readable path, used in sentinel lines and log output
    pub display_path: String,

    /// Context handed back to `resolve_path` for the includes of this file
    pub context: IncludeContext,
}

/// User-supplied include reader
pub trait IncludeProvider {
    type IncludeContext;

    fn resolve_path(
        &self,
        path: &str,
        context: &Self::IncludeContext,
    ) -> Result<ResolvedInclude<Self::IncludeContext>, BoxedIncludeProviderError>;

    fn get_include(
        &mut self,
        path: &ResolvedIncludePath,
    ) -> Result<String, BoxedIncludeProviderError>;
}

/// Reads includes from disk. Paths are relative to the directory of the
/// including file; the context is that directory.
#[derive(Default)]
pub struct FileIncludeProvider;

impl IncludeProvider for FileIncludeProvider {
    type IncludeContext = PathBuf;

    fn resolve_path(
        &self,
        path: &str,
        context: &Self::IncludeContext,
    ) -> Result<ResolvedInclude<Self::IncludeContext>, BoxedIncludeProviderError> {
        let joined = context.join(path);
        let absolute = if joined.is_absolute() {
            joined.clone()
        } else {
            std::env::current_dir()?.join(&joined)
        };

        Ok(ResolvedInclude {
            resolved_path: ResolvedIncludePath(
                normalize_lexically(&absolute).to_string_lossy().into_owned(),
            ),
            display_path: joined.to_string_lossy().into_owned(),
            context: joined.parent().map(Path::to_path_buf).unwrap_or_default(),
        })
    }

    fn get_include(
        &mut self,
        resolved: &ResolvedIncludePath,
    ) -> Result<String, BoxedIncludeProviderError> {
        Ok(std::fs::read_to_string(&resolved.0)?)
    }
}

/// Collapses `.` and `..` without touching the file system.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
