mod dump_segments;
use dump_segments::dump_segments;
mod dump_strings;
use dump_strings::dump_strings;
mod export_strings;
use export_strings::export_strings;
mod pack_snapshot;
use pack_snapshot::pack_snapshot;
mod resolve_definitions;
use resolve_definitions::resolve_definitions;

use defined_strings::{
    EscapePolicy, Program, ProgramSnapshot, SnapshotCompression,
};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Export the defined strings of an analyzed program
#[derive(Clone, Debug, Parser)]
struct Args {
    /// input program snapshot
    #[arg(short, long)]
    input: PathBuf,
    /// parse the input using this format, if not specified use the input file ext, otherwise default to the binary snapshot
    #[arg(short, long, value_enum)]
    force_type: Option<FileType>,
    // operation to execute
    #[command(subcommand)]
    operation: Operation,
}

/// File type to parse
#[derive(Clone, Copy, Debug, ValueEnum)]
enum FileType {
    /// Binary program snapshot
    Snapshot,
    /// YAML program snapshot
    Yaml,
}

#[derive(Clone, Debug, Subcommand)]
enum Operation {
    /// Write the strings report into the output file
    ExportStrings(ExportStringsArgs),
    /// Dump the memory layout
    DumpSegments,
    /// Print the strings report definitions
    DumpStrings(DumpStringsArgs),
    /// Print the file position of every definition of a report
    ResolveDefinitions(ResolveDefinitionsArgs),
    /// Write the input as a binary program snapshot
    PackSnapshot(PackSnapshotArgs),
}

/// Characters escaped in the string values
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum EscapeArg {
    /// only new lines and carriage returns
    #[default]
    LineBreaks,
    /// all control characters
    Control,
}

impl From<EscapeArg> for EscapePolicy {
    fn from(value: EscapeArg) -> Self {
        match value {
            EscapeArg::LineBreaks => EscapePolicy::LineBreaks,
            EscapeArg::Control => EscapePolicy::Control,
        }
    }
}

/// Export the strings report. Expects a single output file argument.
#[derive(Clone, Debug, Parser)]
struct ExportStringsArgs {
    #[arg(short, long, value_enum, default_value_t)]
    escape: EscapeArg,
    /// output filename
    args: Vec<String>,
}

#[derive(Clone, Debug, Parser)]
struct DumpStringsArgs {
    #[arg(short, long, value_enum, default_value_t)]
    escape: EscapeArg,
}

#[derive(Clone, Debug, Parser)]
struct ResolveDefinitionsArgs {
    /// strings report to resolve
    report: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum CompressionArg {
    None,
    Zlib,
    #[default]
    Zstd,
}

impl From<CompressionArg> for SnapshotCompression {
    fn from(value: CompressionArg) -> Self {
        match value {
            CompressionArg::None => SnapshotCompression::None,
            CompressionArg::Zlib => SnapshotCompression::Zlib,
            CompressionArg::Zstd => SnapshotCompression::Zstd,
        }
    }
}

/// Convert the input into a binary program snapshot
#[derive(Clone, Debug, Parser)]
struct PackSnapshotArgs {
    #[arg(short, long, value_enum, default_value_t)]
    compression: CompressionArg,
    /// output filename
    output: PathBuf,
}

impl Args {
    pub fn input_type(&self) -> FileType {
        if let Some(input_type) = self.force_type {
            return input_type;
        }
        match self.input.extension().and_then(std::ffi::OsStr::to_str) {
            Some("yaml") | Some("yml") => FileType::Yaml,
            _ => FileType::Snapshot,
        }
    }
}

fn read_snapshot(args: &Args) -> Result<ProgramSnapshot> {
    let snapshot = match args.input_type() {
        FileType::Yaml => {
            let input = std::fs::read_to_string(&args.input)?;
            ProgramSnapshot::from_yaml(&input)
        }
        FileType::Snapshot => {
            let mut input = BufReader::new(File::open(&args.input)?);
            ProgramSnapshot::read(&mut input)
        }
    };
    snapshot.with_context(|| {
        format!("Unable to read the program {}", args.input.display())
    })
}

fn get_program(args: &Args) -> Result<Program> {
    Program::new(read_snapshot(args)?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match &args.operation {
        Operation::ExportStrings(export_args) => {
            export_strings(&args, export_args)
        }
        Operation::DumpSegments => dump_segments(&args),
        Operation::DumpStrings(dump_args) => dump_strings(&args, dump_args),
        Operation::ResolveDefinitions(resolve_args) => {
            resolve_definitions(&args, resolve_args)
        }
        Operation::PackSnapshot(pack_args) => pack_snapshot(&args, pack_args),
    }
}
