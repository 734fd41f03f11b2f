use thiserror::Error;

use std::path::PathBuf;

/// Errors that abort a string export.
///
/// None of them is recoverable: a report is either complete or it is not
/// written at all.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A memory block is not backed by exactly one region of the original file.
    #[error("Segment '{name}' is backed by {sources} file regions, only segments with a single file region are supported")]
    UnsupportedSegment { name: String, sources: usize },

    /// A string is not contained by exactly one memory block.
    #[error("String at {address:#x} is contained by {blocks} memory blocks, expected one")]
    OutsideSegment { address: u64, blocks: usize },

    /// Creating or writing the report failed.
    #[error("Unable to write the report {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
