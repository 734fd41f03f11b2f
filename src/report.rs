use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Deserializer};

use std::fmt;
use std::io::Write;

use crate::encoding::Encoding;
use crate::layout::Segment;
use crate::record::StringRecord;

const COMMENT_PREFIX: &str = "  # ";

/// The memory layout and the strings of one program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub segments: Vec<Segment>,
    pub definitions: Vec<StringRecord>,
}

#[derive(Deserialize)]
struct ReportDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    offset: Vec<Segment>,
    #[serde(default, deserialize_with = "null_as_empty")]
    definitions: Vec<DefinitionDocument>,
}

#[derive(Deserialize)]
struct DefinitionDocument {
    address: u64,
    size: u64,
    encoding: Encoding,
    #[serde(default, deserialize_with = "null_as_empty")]
    pointers: Vec<u64>,
}

// an empty sequence is written as a key without value
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Format `value` as a single line YAML scalar, quoted only when a plain
/// scalar would read back as something else.
fn yaml_scalar(value: &str) -> String {
    match serde_yaml::to_string(value) {
        Ok(scalar) if scalar.trim_end_matches('\n').lines().count() == 1 => {
            scalar.trim_end_matches('\n').to_owned()
        }
        // multi-line or empty output, fall back to a double quoted scalar
        _ => {
            let mut quoted = String::with_capacity(value.len() + 2);
            quoted.push('"');
            for c in value.chars() {
                match c {
                    '"' => quoted.push_str("\\\""),
                    '\\' => quoted.push_str("\\\\"),
                    '\n' => quoted.push_str("\\n"),
                    '\r' => quoted.push_str("\\r"),
                    '\t' => quoted.push_str("\\t"),
                    c if c.is_control() => {
                        quoted.push_str(&format!("\\x{:02x}", u32::from(c)));
                    }
                    '\u{2028}' | '\u{2029}' => {
                        quoted.push_str(&format!("\\u{:04x}", u32::from(c)));
                    }
                    c => quoted.push(c),
                }
            }
            quoted.push('"');
            quoted
        }
    }
}

/// The report text, layout first and then the definitions, without changing
/// the order of either.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "offset:")?;
        for segment in &self.segments {
            writeln!(f, "  - name: {}", yaml_scalar(&segment.name))?;
            writeln!(f, "    ram: {:#x}", segment.base_address)?;
            writeln!(f, "    file: {:#x}", segment.file_offset)?;
        }
        writeln!(f)?;

        writeln!(f, "definitions:")?;
        for record in &self.definitions {
            writeln!(f, "{COMMENT_PREFIX}{}", record.value)?;
            writeln!(f, "  - address: {:#x}", record.address)?;
            writeln!(f, "    size: {}", record.length)?;
            writeln!(f, "    encoding: {}", yaml_scalar(record.encoding.name()))?;
            writeln!(f, "    pointers:")?;
            for reference in &record.references {
                writeln!(f, "      - {reference:#x}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Report {
    /// Write the report, stopping at the first failed write.
    pub fn write(&self, fmt: &mut impl Write) -> std::io::Result<()> {
        write!(fmt, "{self}")
    }

    /// Read back a written report.
    ///
    /// The string values are taken from the comment line preceding each
    /// definition.
    pub fn parse(input: &str) -> Result<Self> {
        let document: ReportDocument = serde_yaml::from_str(input)
            .context("Unable to parse the strings report")?;
        let values: Vec<&str> = input
            .lines()
            .filter_map(|line| {
                line.strip_prefix(COMMENT_PREFIX)
                    .or_else(|| (line == COMMENT_PREFIX.trim_end()).then_some(""))
            })
            .collect();
        ensure!(
            values.len() == document.definitions.len(),
            "Found {} string comments for {} definitions",
            values.len(),
            document.definitions.len()
        );
        let definitions = document
            .definitions
            .into_iter()
            .zip(values)
            .map(|(definition, value)| StringRecord {
                address: definition.address,
                length: definition.size,
                value: value.to_owned(),
                encoding: definition.encoding,
                references: definition.pointers,
            })
            .collect();
        Ok(Self {
            segments: document.offset,
            definitions,
        })
    }

    /// Offset in the original file of a runtime address.
    ///
    /// Uses the segment with the highest base address not above `address`.
    pub fn file_position(&self, address: u64) -> Option<u64> {
        let segment = self
            .segments
            .iter()
            .filter(|segment| segment.base_address <= address)
            .max_by_key(|segment| segment.base_address)?;
        segment
            .file_offset
            .checked_add(address - segment.base_address)
    }
}
