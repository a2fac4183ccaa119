use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use shader_audit::console::{paint, Tint};
use shader_audit::report::generate_markdown_report;
use shader_audit::{classify_block, process_file, FileIncludeProvider, ResolveOptions, ToolError};

/// Block name used in the report header when none was found or requested.
const DEFAULT_BLOCK_NAME: &str = "FieldVisualConfig";

/// Audit GLSL uniform blocks for UBO refactor classification
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to GLSL file containing uniform block
    glsl_file: PathBuf,

    /// Specific uniform block name to parse (default: first found)
    #[arg(short, long, value_name = "NAME")]
    block: Option<String>,

    /// Output markdown file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Don't expand #include directives
    #[arg(long)]
    no_preprocess: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", paint(Tint::Red, format!("Error: {}", err)));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ToolError> {
    if !args.glsl_file.exists() {
        return Err(ToolError::ShaderNotFound {
            path: args.glsl_file.clone(),
        });
    }

    let content = if args.no_preprocess {
        std::fs::read_to_string(&args.glsl_file).map_err(|source| ToolError::Io {
            path: args.glsl_file.clone(),
            source,
        })?
    } else {
        process_file(
            &args.glsl_file.to_string_lossy(),
            &mut FileIncludeProvider,
            PathBuf::new(),
            &ResolveOptions::default(),
        )
        .to_string()
    };

    eprintln!("{}", paint(Tint::Cyan, "Parsing uniform blocks..."));

    let classified = classify_block(&content, args.block.as_deref());

    if classified.parameters.is_empty() {
        eprintln!(
            "{}",
            paint(Tint::Yellow, "Warning: No parameters found in uniform block")
        );
        eprintln!(
            "{}",
            paint(
                Tint::Yellow,
                "Try specifying --block <name> or check if file has std140 uniform blocks"
            )
        );
    } else {
        eprintln!(
            "{}",
            paint(
                Tint::Green,
                format!("Found {} parameters", classified.parameters.len())
            )
        );
    }

    let block_name = classified
        .block_name
        .as_deref()
        .or(args.block.as_deref())
        .unwrap_or(DEFAULT_BLOCK_NAME);

    let report = generate_markdown_report(
        &classified.parameters,
        &args.glsl_file.to_string_lossy(),
        block_name,
    );

    match &args.output {
        Some(output) => {
            std::fs::write(output, report).map_err(|source| ToolError::Io {
                path: output.clone(),
                source,
            })?;
            eprintln!(
                "{}",
                paint(
                    Tint::Green,
                    format!("Report written to: {}", output.display())
                )
            );
        }
        None => println!("{}", report),
    }

    Ok(())
}
