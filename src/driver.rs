use tracing::{info, warn};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ExportError;
use crate::layout::extract_layout;
use crate::program::ProgramModel;
use crate::record::{string_records, EscapePolicy};
use crate::report::Report;

pub const USAGE: &str = "USAGE: export-strings <output_file>";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub escape: EscapePolicy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The arguments were wrong, nothing was done.
    Usage,
    Exported { segments: usize, definitions: usize },
}

/// Collect the memory layout and every string of the program.
pub fn build_report<P: ProgramModel>(
    program: &P,
    options: &ExportOptions,
) -> Result<Report, ExportError> {
    let segments = extract_layout(program)?;
    let definitions = string_records(program, options.escape)?;
    Ok(Report {
        segments,
        definitions,
    })
}

/// Export the strings report into the file named by the only argument.
///
/// The report is fully built before the output file is created, so a
/// failing program leaves the file system untouched. A failure while writing
/// leaves an incomplete file behind that must not be used.
pub fn export_defined_strings<P: ProgramModel>(
    program: &P,
    args: &[String],
    options: &ExportOptions,
) -> Result<ExportOutcome, ExportError> {
    let [output_path] = args else {
        warn!("{USAGE}");
        return Ok(ExportOutcome::Usage);
    };

    info!("Exporting defined strings into {output_path}");
    let report = build_report(program, options)?;
    write_report(&report, Path::new(output_path))?;
    info!(
        "Done! {} segments and {} strings",
        report.segments.len(),
        report.definitions.len()
    );
    Ok(ExportOutcome::Exported {
        segments: report.segments.len(),
        definitions: report.definitions.len(),
    })
}

fn write_report(report: &Report, path: &Path) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: path.to_owned(),
        source,
    };
    let mut output = BufWriter::new(File::create(path).map_err(io_error)?);
    report.write(&mut output).map_err(io_error)?;
    output.flush().map_err(io_error)?;
    Ok(())
}
