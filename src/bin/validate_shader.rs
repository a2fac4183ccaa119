use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use shader_audit::console::{paint, Tint};
use shader_audit::validator::{discover_shaders, validate_shader, ValidatorConfig};
use shader_audit::{ResolveOptions, Severity};

/// Validate GLSL shaders with include preprocessing
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to shader file to validate
    shader: Option<PathBuf>,

    /// Validate every shader found in the shader directory
    #[arg(long)]
    auto: bool,

    /// Validator executable
    #[arg(long, value_name = "EXE", default_value = "glslangValidator")]
    validator: PathBuf,

    /// Directory searched by --auto
    #[arg(long, value_name = "DIR")]
    shader_dir: Option<PathBuf>,

    /// Maximum include nesting below the shader (unbounded if omitted)
    #[arg(long, value_name = "N")]
    max_include_depth: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let mut config = ValidatorConfig {
        executable: args.validator.clone(),
        resolve: ResolveOptions {
            max_depth: args.max_include_depth,
        },
        ..Default::default()
    };
    if let Some(dir) = &args.shader_dir {
        config.shader_dir = dir.clone();
    }

    let success = if args.auto {
        validate_all(&config)
    } else if let Some(shader) = &args.shader {
        validate(shader, &config)
    } else {
        let _ = Args::command().print_help();
        false
    };

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn banner(text: &str) {
    println!("\n{}", paint(Tint::Cyan, "=".repeat(60)));
    println!("{}", paint(Tint::Cyan, text));
    println!("{}", paint(Tint::Cyan, "=".repeat(60)));
}

fn validate_all(config: &ValidatorConfig) -> bool {
    let shaders = discover_shaders(&config.shader_dir, &config.extension);
    if shaders.is_empty() {
        println!("{}", paint(Tint::Red, "No shaders found!"));
        return false;
    }

    println!(
        "{}\n",
        paint(
            Tint::Cyan,
            format!("════ VALIDATING {} SHADERS ════", shaders.len())
        )
    );

    let mut results = Vec::new();
    for shader in &shaders {
        let name = shader
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        banner(&format!("Validating: {}", name));
        let success = validate(shader, config);
        results.push((name, success));
    }

    banner("SUMMARY");

    let passed = results.iter().filter(|(_, success)| *success).count();
    let failed = results.len() - passed;

    for (name, success) in &results {
        let status = if *success {
            paint(Tint::Green, "✅ PASS")
        } else {
            paint(Tint::Red, "❌ FAIL")
        };
        println!("  {}  {}", status, name);
    }

    println!();
    if failed == 0 {
        println!(
            "{}",
            paint(Tint::Green, format!("All {} shaders passed!", passed))
        );
        true
    } else {
        println!(
            "{}",
            paint(
                Tint::Red,
                format!("{} shaders failed, {} passed", failed, passed)
            )
        );
        false
    }
}

fn validate(shader: &Path, config: &ValidatorConfig) -> bool {
    let outcome = match validate_shader(shader, config) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("{}", paint(Tint::Red, format!("Error: {}", err)));
            return false;
        }
    };

    println!("\n{}", paint(Tint::Cyan, "--- Static Analysis ---"));
    println!("Found {} active uniforms.", outcome.uniforms.len());

    println!("\n{}", paint(Tint::Cyan, "--- GLSL Compilation Check ---"));
    for entry in &outcome.report.entries {
        match entry.severity {
            Severity::Error => println!("{}", paint(Tint::Red, &entry.text)),
            Severity::Warning => println!("{}", paint(Tint::Yellow, &entry.text)),
            Severity::Info => println!("{}", entry.text),
        }
    }

    if outcome.success {
        println!("\n{}", paint(Tint::Green, "✅ VALIDATION SUCCEEDED"));
    } else {
        println!("\n{}", paint(Tint::Red, "❌ VALIDATION FAILED"));
        for context in outcome.report.contexts() {
            print!("{}", context.tinted());
        }
    }

    outcome.success
}
