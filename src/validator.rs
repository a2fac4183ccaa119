//! Validation of a shader through an external compiler.
//!
//! The shader is flattened, written to a scratch file, and handed to the compiler
//! (`glslangValidator` by default). The scratch file is removed on every exit path.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::diagnostics::{
    annotate, rename_scratch_references, AnnotatedReport, ShaderCompilerOutput,
};
use crate::{
    extract_uniforms, process_file, FileIncludeProvider, ResolveOptions, ToolError, Uniform,
};

#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Compiler executable, looked up on `PATH` if not absolute
    pub executable: PathBuf,

    /// Shader stage passed to `-S`
    pub stage: String,

    /// Where the flattened source is written for the compiler
    pub scratch_file: PathBuf,

    /// Directory searched by `--auto`
    pub shader_dir: PathBuf,

    /// File extension (without the dot) of shaders picked up by `--auto`
    pub extension: String,

    pub resolve: ResolveOptions,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            executable: PathBuf::from("glslangValidator"),
            stage: "frag".to_owned(),
            scratch_file: PathBuf::from("temp_validated_shader.frag"),
            shader_dir: PathBuf::from("src/main/resources/assets/the-virus-block/shaders/post"),
            extension: "fsh".to_owned(),
            resolve: ResolveOptions::default(),
        }
    }
}

/// A file that is deleted when dropped.
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn create(path: &Path, contents: &str) -> Result<ScratchFile, ToolError> {
        std::fs::write(path, contents).map_err(|source| ToolError::ScratchFile {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(ScratchFile {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => log::error!("Failed to remove {:?}: {}", self.path, err),
        }
    }
}

/// Runs the external compiler on `path` and waits for it to finish.
pub fn run_validator(
    config: &ValidatorConfig,
    path: &Path,
) -> Result<ShaderCompilerOutput, ToolError> {
    let output = Command::new(&config.executable)
        .arg("-S")
        .arg(&config.stage)
        .arg("-C")
        .arg(path)
        .output()
        .map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ToolError::ValidatorNotFound {
                    executable: config.executable.clone(),
                }
            } else {
                ToolError::ValidatorLaunch {
                    executable: config.executable.clone(),
                    source: err,
                }
            }
        })?;

    Ok(ShaderCompilerOutput {
        success: output.status.success(),
        log: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

pub struct ValidationOutcome {
    /// File name of the validated shader
    pub shader_name: String,

    /// Uniforms found in the flattened source
    pub uniforms: Vec<Uniform>,

    /// Compiler log with scratch file references renamed, plus error context
    pub report: AnnotatedReport,

    pub success: bool,
}

/// Flattens `shader_path`, extracts its uniforms, and validates it with `compiler_fn`,
/// which receives the path of the scratch file holding the flattened source.
pub fn validate_shader_with<F>(
    shader_path: &Path,
    config: &ValidatorConfig,
    compiler_fn: F,
) -> Result<ValidationOutcome, ToolError>
where
    F: FnOnce(&Path) -> Result<ShaderCompilerOutput, ToolError>,
{
    if !shader_path.exists() {
        return Err(ToolError::ShaderNotFound {
            path: shader_path.to_path_buf(),
        });
    }

    let shader_name = shader_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| shader_path.to_string_lossy().into_owned());

    let flattened = process_file(
        &shader_path.to_string_lossy(),
        &mut FileIncludeProvider,
        PathBuf::new(),
        &config.resolve,
    );

    let flattened_text = flattened.to_string();
    let scratch = ScratchFile::create(&config.scratch_file, &flattened_text)?;

    let uniforms = extract_uniforms(&flattened_text);
    log::info!("Found {} active uniforms.", uniforms.len());

    let compiled = compiler_fn(scratch.path())?;

    // Line numbers are read from the raw log; only the displayed text is renamed.
    let mut report = annotate(&flattened, &compiled.log);
    let scratch_name = config.scratch_file.to_string_lossy();
    for entry in &mut report.entries {
        entry.text = rename_scratch_references(&entry.text, &scratch_name, &shader_name);
    }

    Ok(ValidationOutcome {
        shader_name,
        uniforms,
        report,
        success: compiled.success,
    })
}

/// Validates `shader_path` with the compiler named in `config`.
pub fn validate_shader(
    shader_path: &Path,
    config: &ValidatorConfig,
) -> Result<ValidationOutcome, ToolError> {
    validate_shader_with(shader_path, config, |scratch| run_validator(config, scratch))
}

/// Files directly inside `dir` with the given extension, sorted by name.
/// A missing directory yields an empty list.
pub fn discover_shaders(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::debug!("Cannot read shader directory {:?}: {}", dir, err);
            return Vec::new();
        }
    };

    let mut shaders: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().map_or(false, |ext| ext == extension))
        .collect();

    shaders.sort();
    shaders
}
