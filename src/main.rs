//! fmtstyle: extract the clang-format option surface from LLVM's Format.h.
//!
//! Subcommands:
//!
//! - **parse**: `fmtstyle parse Format.h -f json -o format_style_fields.json`
//! - **fetch**: `fmtstyle fetch 19 -o Format.h`
//! - **config**: `fmtstyle config Format.h --set ColumnLimit=100 -o .clang-format`
//! - **preview**: `fmtstyle preview Format.h --set BreakBeforeBraces=Allman`

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fmtstyle::config::StyleConfig;
use fmtstyle::parser::{self, ParseOptions};
use fmtstyle::preview::{self, PreviewOptions};
use fmtstyle::render;
use fmtstyle::source::{self, FileSource, HeaderSource, LlvmRelease, StdinSource};
use fmtstyle::StyleModel;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_HEADER: &str = "Format.h";
const OUTPUT_STEM: &str = "format_style_fields";

#[derive(Parser)]
#[command(
    name = "fmtstyle",
    version,
    about = "Extract clang-format style options from LLVM's Format.h"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract fields, enums and nested structs from the style struct
    Parse(ParseArgs),
    /// Download Format.h for an LLVM release
    Fetch(FetchArgs),
    /// Write a .clang-format document from KEY=VALUE selections
    Config(ConfigArgs),
    /// Run clang-format over a code sample with a draft style
    Preview(PreviewArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Header to read; `-` reads stdin
    #[arg(default_value = DEFAULT_HEADER)]
    file: String,

    /// Download Format.h of this LLVM major version instead of reading FILE
    #[arg(long, value_name = "VERSION")]
    llvm: Option<String>,

    /// Name of the struct whose body is extracted
    #[arg(long = "struct", value_name = "NAME", default_value = parser::DEFAULT_TARGET)]
    target: String,

    /// Register every nested type before extracting, so fields may use
    /// types declared further down
    #[arg(long)]
    resolve_forward_refs: bool,
}

#[derive(Args)]
struct ParseArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output format: json (default), markdown, text
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Output file or directory (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct FetchArgs {
    /// LLVM major version, e.g. 19
    #[arg(required_unless_present = "list_versions")]
    version: Option<String>,

    /// Output file
    #[arg(short = 'o', long, default_value = DEFAULT_HEADER)]
    output: PathBuf,

    /// Show the release branches that usually carry Format.h
    #[arg(long)]
    list_versions: bool,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Option assignment, repeatable. Nested struct members use
    /// Parent.Member, e.g. BraceWrapping.AfterClass=true
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    settings: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct PreviewArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Option assignment, repeatable
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    settings: Vec<String>,

    /// C++ file to format instead of the built-in sample
    #[arg(long)]
    sample: Option<PathBuf>,

    /// Formatter executable
    #[arg(long = "clang-format", default_value = preview::DEFAULT_FORMATTER)]
    clang_format: String,

    /// File name the formatter uses to pick the language
    #[arg(long, default_value = "sample.cpp")]
    assume_filename: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match &cli.command {
        Command::Parse(args) => parse_command(args),
        Command::Fetch(args) => fetch_command(args),
        Command::Config(args) => config_command(args),
        Command::Preview(args) => preview_command(args),
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match (quiet, verbose) {
            (true, _) => tracing_subscriber::EnvFilter::new("error"),
            (false, 0) => tracing_subscriber::EnvFilter::new("warn"),
            (false, 1) => tracing_subscriber::EnvFilter::new("info"),
            (false, 2) => tracing_subscriber::EnvFilter::new("debug"),
            (false, _) => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Read the header from wherever `input` points and extract the model.
fn load_model(input: &InputArgs) -> Result<StyleModel> {
    let source: Box<dyn HeaderSource> = match &input.llvm {
        Some(version) => Box::new(LlvmRelease::parse(version)?),
        None if input.file == "-" => Box::new(StdinSource),
        None => Box::new(FileSource {
            path: PathBuf::from(&input.file),
        }),
    };

    let text = source.read().with_context(|| {
        if input.llvm.is_none() && input.file == DEFAULT_HEADER {
            format!(
                "failed to read {} (download it first with `fmtstyle fetch <VERSION>`)",
                DEFAULT_HEADER
            )
        } else {
            format!("failed to read {}", source.id())
        }
    })?;

    let options = ParseOptions {
        target: input.target.clone(),
        resolve_forward_refs: input.resolve_forward_refs,
        source_id: source.id(),
    };
    parser::parse(&text, &options).with_context(|| format!("failed to parse {}", source.id()))
}

/// Write to `output`, or stdout when no path was given.
fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn parse_command(args: &ParseArgs) -> Result<()> {
    let renderer = render::create_renderer(&args.format)?;
    let model = load_model(&args.input)?;

    // An existing directory receives format_style_fields.<ext>
    let output = args.output.as_deref().map(|path| {
        if path.is_dir() {
            path.join(format!("{}.{}", OUTPUT_STEM, renderer.file_extension()))
        } else {
            path.to_path_buf()
        }
    });
    emit(output.as_deref(), &renderer.render(&model)?)
}

fn fetch_command(args: &FetchArgs) -> Result<()> {
    if args.list_versions {
        print!("{}", source::version_listing());
        return Ok(());
    }

    let version = args
        .version
        .as_deref()
        .context("version argument is required when not using --list-versions")?;
    let release = LlvmRelease::parse(version)?;
    let text = release.read()?;
    fs::write(&args.output, &text)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "Downloaded Format.h for LLVM {} to {} ({} characters)",
        release.version,
        args.output.display(),
        text.len()
    );
    Ok(())
}

fn config_command(args: &ConfigArgs) -> Result<()> {
    let model = load_model(&args.input)?;
    let config = StyleConfig::from_assignments(&model, &args.settings)?;
    emit(args.output.as_deref(), &config.to_yaml()?)
}

fn preview_command(args: &PreviewArgs) -> Result<()> {
    let model = load_model(&args.input)?;
    let config = StyleConfig::from_assignments(&model, &args.settings)?;

    let sample = match &args.sample {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read sample {}", path.display()))?,
        None => preview::SAMPLE_CODE.to_string(),
    };

    let options = PreviewOptions {
        program: args.clang_format.clone(),
        assume_filename: args.assume_filename.clone(),
    };
    print!("{}", preview::run(&options, &config, &sample)?);
    Ok(())
}
