use serde::{Deserialize, Serialize};

use std::fmt;

use crate::program::DataType;

/// Encoding names written in the report.
///
/// The unicode families and ascii get a canonical name, any other character
/// set is kept under its own (lowercased) name so the report consumer can
/// look it up.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Encoding {
    Ascii,
    Utf8,
    Utf16,
    Utf32,
    Other(String),
}

impl Encoding {
    pub fn name(&self) -> &str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16 => "utf-16",
            Encoding::Utf32 => "utf-32",
            Encoding::Other(name) => name,
        }
    }

    /// Map a character set name, as reported by a string type, to its
    /// encoding.
    ///
    /// Matching ignores case and the usual separators, so `US-ASCII`,
    /// `utf_16le` and `UTF16` are all recognized. Unknown names are kept
    /// trimmed and lowercased.
    pub fn from_charset(charset: &str) -> Self {
        let normalized: String = charset
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "ascii" | "usascii" | "iso646us" | "ansix3.41968" => {
                Encoding::Ascii
            }
            "utf8" => Encoding::Utf8,
            "utf16" | "utf16le" | "utf16be" | "ucs2" => Encoding::Utf16,
            "utf32" | "utf32le" | "utf32be" | "ucs4" => Encoding::Utf32,
            _ => Encoding::Other(charset.trim().to_ascii_lowercase()),
        }
    }
}

impl From<String> for Encoding {
    fn from(value: String) -> Self {
        Self::from_charset(&value)
    }
}

impl From<Encoding> for String {
    fn from(value: Encoding) -> Self {
        match value {
            Encoding::Other(name) => name,
            known => known.name().to_owned(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// String conventions recognized by the analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringTag {
    /// narrow, fixed length
    String,
    /// narrow, null terminated
    TerminatedCString,
    /// 16bits chars, fixed length
    Unicode,
    /// 16bits chars, null terminated
    TerminatedUnicode,
    /// 32bits chars, fixed length
    Unicode32,
    /// 32bits chars, null terminated
    TerminatedUnicode32,
    Utf8String,
    /// narrow, length prefixed
    PascalString,
    /// 16bits chars, length prefixed
    PascalUnicode,
}

impl StringTag {
    /// Encoding used when the type does not report its own character set.
    pub const fn default_encoding(self) -> Encoding {
        match self {
            StringTag::String
            | StringTag::TerminatedCString
            | StringTag::PascalString => Encoding::Ascii,
            StringTag::Unicode
            | StringTag::TerminatedUnicode
            | StringTag::PascalUnicode => Encoding::Utf16,
            StringTag::Unicode32 | StringTag::TerminatedUnicode32 => {
                Encoding::Utf32
            }
            StringTag::Utf8String => Encoding::Utf8,
        }
    }
}

/// A data type that holds text.
pub trait StringLike {
    fn tag(&self) -> StringTag;

    /// Name of the character set the type decodes with, if it knows it.
    fn character_set(&self) -> Option<&str>;

    fn encoding(&self) -> Encoding {
        match self.character_set().map(str::trim) {
            Some(charset) if !charset.is_empty() => {
                Encoding::from_charset(charset)
            }
            _ => self.tag().default_encoding(),
        }
    }
}

/// Resolve the encoding of a data type, `None` if it is not a string.
pub fn classify(data_type: &DataType) -> Option<Encoding> {
    data_type.as_string_like().map(StringLike::encoding)
}
