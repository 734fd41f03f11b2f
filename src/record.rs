use serde::Serialize;
use tracing::debug;

use std::borrow::Cow;

use crate::encoding::{classify, Encoding};
use crate::error::ExportError;
use crate::program::{DataItem, ProgramModel};

/// One string of the program, ready to be written in the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StringRecord {
    pub address: u64,
    #[serde(rename = "size")]
    pub length: u64,
    /// Escaped value, only written as a comment.
    pub value: String,
    pub encoding: Encoding,
    #[serde(rename = "pointers")]
    pub references: Vec<u64>,
}

impl StringRecord {
    pub fn new<P: ProgramModel>(
        program: &P,
        item: &DataItem,
        encoding: Encoding,
        escape: EscapePolicy,
    ) -> Self {
        let value = item.value.as_deref().unwrap_or_default();
        Self {
            address: item.address,
            length: item.len,
            value: escape.escape(value).into_owned(),
            encoding,
            references: program.references_to(item.address).collect(),
        }
    }
}

/// Characters replaced by an escape sequence in the string values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EscapePolicy {
    /// Only `\n` and `\r`.
    #[default]
    LineBreaks,
    /// Every control and line separator character.
    Control,
}

impl EscapePolicy {
    fn is_escaped(self, c: char) -> bool {
        match self {
            EscapePolicy::LineBreaks => matches!(c, '\n' | '\r'),
            EscapePolicy::Control => {
                c.is_control() || matches!(c, '\u{2028}' | '\u{2029}')
            }
        }
    }

    /// Make `value` fit in a single line.
    pub fn escape(self, value: &str) -> Cow<'_, str> {
        if !value.chars().any(|c| self.is_escaped(c)) {
            return Cow::Borrowed(value);
        }
        let mut escaped = String::with_capacity(value.len() + 8);
        for c in value.chars() {
            match c {
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\t' if self.is_escaped(c) => escaped.push_str("\\t"),
                c if self.is_escaped(c) && u32::from(c) <= 0xFF => {
                    escaped.push_str(&format!("\\x{:02x}", u32::from(c)));
                }
                c if self.is_escaped(c) => {
                    escaped.push_str(&format!("\\u{{{:04x}}}", u32::from(c)));
                }
                c => escaped.push(c),
            }
        }
        Cow::Owned(escaped)
    }
}

/// Build a record for every string in the program, in the data order.
pub fn string_records<P: ProgramModel>(
    program: &P,
    escape: EscapePolicy,
) -> Result<Vec<StringRecord>, ExportError> {
    let mut records = vec![];
    for item in program.defined_data() {
        let Some(encoding) = classify(&item.data_type) else {
            continue;
        };

        #[cfg(feature = "restrictive")]
        {
            let blocks = program
                .memory_blocks()
                .filter(|block| block.contains(item.address))
                .count();
            if blocks != 1 {
                return Err(ExportError::OutsideSegment {
                    address: item.address,
                    blocks,
                });
            }
        }

        let record = StringRecord::new(program, item, encoding, escape);
        debug!(
            "string {:#x} {} {} bytes, {} references",
            record.address,
            record.encoding,
            record.length,
            record.references.len()
        );
        records.push(record);
    }
    Ok(records)
}
