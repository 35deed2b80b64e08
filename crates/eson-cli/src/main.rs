//! eson-dump - Inspect ESON binary documents
//!
//! This tool decodes `.eson` files and prints their contents as an indented
//! tree, a one-line summary, or a list of top-level keys.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, ValueEnum};
use eson_core::value::walk_document;
use eson_core::{
    ArrayLayout, Decoder, DecoderConfig, Document, ObjectFraming, PrinterConfig, StatsVisitor,
    TreePrinter, DEFAULT_MAX_DEPTH,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// File extension picked up in directory mode
const ESON_EXTENSION: &str = "eson";

/// Inspect ESON binary documents
#[derive(Parser, Debug)]
#[command(name = "eson-dump")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    input: InputMode,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(long, value_enum, default_value = "tree")]
    format: OutputFormat,

    /// Byte offset of the document inside each file
    #[arg(long, default_value = "0")]
    offset: usize,

    /// Require an explicit end marker in every object and array
    #[arg(long)]
    strict: bool,

    /// Maximum object/array nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Framing of array items
    #[arg(long, value_enum, default_value = "tagged")]
    array_layout: LayoutArg,

    /// Strip one trailing NUL byte from string values
    #[arg(long)]
    trim_string_nul: bool,

    /// Object sizes leave out the end marker, which follows the extent
    #[arg(long)]
    terminator_excluded: bool,

    /// Number of leading bytes of binary values to show in hex
    #[arg(long, default_value = "0")]
    binary_preview: usize,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a single ESON file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a directory searched recursively for .eson files
    #[arg(short, long)]
    directory: Option<PathBuf>,
}

/// Output format for decoded documents
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Indented tree of every value
    Tree,
    /// One line per file with counts and a content digest
    Summary,
    /// Top-level keys only
    Keys,
}

/// Array framing as exposed on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// Items are tagged values without keys
    Tagged,
    /// Items carry index keys like object elements
    Indexed,
}

impl From<LayoutArg> for ArrayLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Tagged => ArrayLayout::Tagged,
            LayoutArg::Indexed => ArrayLayout::Indexed,
        }
    }
}

impl Cli {
    fn decoder(&self) -> Decoder {
        let config = DecoderConfig::new()
            .max_depth(self.max_depth)
            .strict(self.strict)
            .array_layout(self.array_layout.into())
            .trim_string_nul(self.trim_string_nul)
            .object_framing(if self.terminator_excluded {
                ObjectFraming::TerminatorExcluded
            } else {
                ObjectFraming::TerminatorIncluded
            });
        Decoder::with_config(config)
    }

    fn printer(&self) -> TreePrinter {
        TreePrinter::with_config(PrinterConfig::new().binary_preview(self.binary_preview))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Dispatch based on input mode
    if let Some(ref file) = cli.input.file {
        process_single_file(&cli, file)
    } else if let Some(ref directory) = cli.input.directory {
        process_directory(&cli, directory)
    } else {
        bail!("Either --file or --directory must be specified")
    }
}

/// Process a single ESON file
fn process_single_file(cli: &Cli, file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("Input file does not exist: {}", file.display());
    }
    if !file.is_file() {
        bail!("Input path is not a file: {}", file.display());
    }

    let output = process_file(cli, file)?;
    print!("{}", output);
    Ok(())
}

/// Process every .eson file below a directory
fn process_directory(cli: &Cli, directory: &Path) -> Result<()> {
    if !directory.exists() {
        bail!("Directory does not exist: {}", directory.display());
    }
    if !directory.is_dir() {
        bail!("Path is not a directory: {}", directory.display());
    }

    info!("Scanning directory: {}", directory.display());

    let mut decoded = 0;
    let mut failed = 0;

    for path in find_eson_files(directory) {
        debug!("Processing {}", path.display());
        match process_file(cli, &path) {
            Ok(output) => {
                if matches!(cli.format, OutputFormat::Tree | OutputFormat::Keys) {
                    println!("==> {} <==", path.display());
                }
                print!("{}", output);
                decoded += 1;
            }
            Err(e) => {
                // Log error but continue with other files
                warn!("Error processing {}: {:#}", path.display(), e);
                failed += 1;
            }
        }
    }

    info!("Summary: {} decoded, {} failed", decoded, failed);
    Ok(())
}

/// Collect .eson files below `directory`, skipping hidden entries
fn find_eson_files(directory: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file())
        .filter(|path| {
            !path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(false)
        })
        .filter(|path| {
            let keep = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(ESON_EXTENSION))
                .unwrap_or(false);
            if !keep {
                trace!("Skipping non-eson file: {}", path.display());
            }
            keep
        })
        .collect();

    files.sort();
    files
}

/// Read, decode and render one file
fn process_file(cli: &Cli, path: &Path) -> Result<String> {
    trace!("Reading {}", path.display());
    let data = fs::read(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    trace!("Read {} bytes from {}", data.len(), path.display());

    let doc = cli
        .decoder()
        .decode_at(&data, cli.offset)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;

    if !doc.is_terminated() && !doc.is_empty() {
        debug!("{}: root object has no end marker", path.display());
    }

    render(cli, path, &data, &doc)
}

/// Render a decoded document in the selected output format
fn render(cli: &Cli, path: &Path, data: &[u8], doc: &Document<'_>) -> Result<String> {
    match cli.format {
        OutputFormat::Tree => Ok(cli.printer().render(doc)),
        OutputFormat::Keys => {
            let mut output = String::new();
            for key in doc.keys() {
                output.push_str(key);
                output.push('\n');
            }
            Ok(output)
        }
        OutputFormat::Summary => {
            let mut stats = StatsVisitor::default();
            walk_document(doc, &mut stats).context("Failed to walk document")?;

            Ok(format!(
                "{}: {} elements, {} objects, {} arrays, {} scalars, {} binary bytes, depth {}, blake3 {}\n",
                path.display(),
                doc.len(),
                stats.object_count,
                stats.array_count,
                stats.scalar_count,
                stats.binary_bytes,
                stats.max_depth,
                content_hash(data)
            ))
        }
    }
}

/// Compute a short hash of the input (first 8 chars of blake3)
fn content_hash(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    hash.to_hex()[..8].to_string()
}
