use std::path::PathBuf;

pub type BoxedIncludeProviderError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The top-level shader handed to the tool does not exist
    #[error("main shader file not found: {path:?}")]
    ShaderNotFound { path: PathBuf },

    /// The external validator executable could not be located
    #[error("{executable:?} not found")]
    ValidatorNotFound { executable: PathBuf },

    /// The external validator was found but failed to start
    #[error("failed to run {executable:?}: {source}")]
    ValidatorLaunch {
        executable: PathBuf,
        source: std::io::Error,
    },

    /// Writing the flattened source for the validator failed
    #[error("could not write scratch file {path:?}: {source}")]
    ScratchFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
