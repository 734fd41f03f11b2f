#![forbid(unsafe_code)]
pub mod driver;
pub mod encoding;
pub mod error;
pub mod layout;
pub mod program;
pub mod record;
pub mod report;
pub mod snapshot;


pub use driver::{
    build_report, export_defined_strings, ExportOptions, ExportOutcome, USAGE,
};
pub use encoding::{Encoding, StringLike, StringTag};
pub use error::ExportError;
pub use layout::{extract_layout, Segment};
pub use program::{
    DataItem, DataType, FileSource, MemoryBlock, Program, ProgramModel,
    ProgramSnapshot, Reference, StringDataType,
};
pub use record::{string_records, EscapePolicy, StringRecord};
pub use report::Report;
pub use snapshot::SnapshotCompression;
