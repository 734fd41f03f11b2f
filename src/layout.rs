use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExportError;
use crate::program::ProgramModel;

/// A memory block mapped to a single region of the original file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    #[serde(rename = "ram")]
    pub base_address: u64,
    #[serde(rename = "file")]
    pub file_offset: u64,
}

/// Map every memory block to its location in the original file.
///
/// Fails on the first block that is not backed by exactly one file region,
/// a partial layout is never returned.
pub fn extract_layout<P: ProgramModel>(
    program: &P,
) -> Result<Vec<Segment>, ExportError> {
    program
        .memory_blocks()
        .map(|block| {
            let [source] = block.sources.as_slice() else {
                return Err(ExportError::UnsupportedSegment {
                    name: block.name.clone(),
                    sources: block.sources.len(),
                });
            };
            debug!(
                "segment {} ram {:#x} file {:#x}",
                block.name, block.start, source.file_offset
            );
            Ok(Segment {
                name: block.name.clone(),
                base_address: block.start,
                file_offset: source.file_offset,
            })
        })
        .collect()
}
