use anyhow::{anyhow, ensure, Result};
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::ops::Range;

use crate::encoding::{StringLike, StringTag};

/// Read-only view of an analyzed program.
///
/// Everything the exporter knows about a binary comes through this trait,
/// the analysis that discovered segments, data and references happens
/// upstream.
pub trait ProgramModel {
    /// Memory blocks in the program order.
    fn memory_blocks(&self) -> impl Iterator<Item = &MemoryBlock>;

    /// Defined data items, in non-decreasing address order.
    fn defined_data(&self) -> impl Iterator<Item = &DataItem>;

    /// Source addresses of every reference pointing to `address`, in the
    /// order the reference index stores them.
    fn references_to(&self, address: u64) -> impl Iterator<Item = u64>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub name: String,
    pub start: u64,
    pub len: u64,
    /// Regions of the original file this block was loaded from.
    #[serde(default)]
    pub sources: Vec<FileSource>,
}

impl MemoryBlock {
    pub fn address_range(&self) -> Option<Range<u64>> {
        let end = self.start.checked_add(self.len)?;
        Some(self.start..end)
    }

    pub fn contains(&self, address: u64) -> bool {
        self.address_range()
            .is_some_and(|range| range.contains(&address))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSource {
    pub file_offset: u64,
    pub len: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    pub address: u64,
    /// Size in bytes, terminators included.
    pub len: u64,
    /// The decoded value, as presented by the analysis.
    #[serde(default)]
    pub value: Option<String>,
    pub data_type: DataType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataType {
    pub name: String,
    /// Only present for the string types.
    #[serde(default)]
    pub string: Option<StringDataType>,
}

impl DataType {
    pub fn as_string_like(&self) -> Option<&StringDataType> {
        self.string.as_ref()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringDataType {
    pub tag: StringTag,
    #[serde(default)]
    pub charset: Option<String>,
}

impl StringLike for StringDataType {
    fn tag(&self) -> StringTag {
        self.tag
    }

    fn character_set(&self) -> Option<&str> {
        self.charset.as_deref()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub from: u64,
    pub to: u64,
}

/// Everything captured from the analysis database, as stored on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSnapshot {
    #[serde(default)]
    pub blocks: Vec<MemoryBlock>,
    #[serde(default)]
    pub data: Vec<DataItem>,
    #[serde(default)]
    pub references: Vec<Reference>,
}

/// A [ProgramSnapshot] with its inbound reference index.
#[derive(Clone, Debug)]
pub struct Program {
    snapshot: ProgramSnapshot,
    references_to: HashMap<u64, Vec<u64>>,
}

impl Program {
    pub fn new(snapshot: ProgramSnapshot) -> Result<Self> {
        for block in &snapshot.blocks {
            ensure!(
                block.address_range().is_some(),
                "Memory block '{}' at {:#x} overflows the address space",
                block.name,
                block.start
            );
        }
        if let Some(pair) = snapshot
            .data
            .windows(2)
            .find(|pair| pair[0].address > pair[1].address)
        {
            return Err(anyhow!(
                "Defined data is not sorted by address: {:#x} before {:#x}",
                pair[0].address,
                pair[1].address
            ));
        }

        let mut references_to: HashMap<u64, Vec<u64>> = HashMap::new();
        for reference in &snapshot.references {
            references_to
                .entry(reference.to)
                .or_default()
                .push(reference.from);
        }
        Ok(Self {
            snapshot,
            references_to,
        })
    }

    pub fn snapshot(&self) -> &ProgramSnapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> ProgramSnapshot {
        self.snapshot
    }

    pub fn data_at(&self, address: u64) -> Option<&DataItem> {
        let idx = self
            .snapshot
            .data
            .partition_point(|item| item.address < address);
        self.snapshot
            .data
            .get(idx)
            .filter(|item| item.address == address)
    }
}

impl TryFrom<ProgramSnapshot> for Program {
    type Error = anyhow::Error;

    fn try_from(value: ProgramSnapshot) -> Result<Self> {
        Self::new(value)
    }
}

impl ProgramModel for Program {
    fn memory_blocks(&self) -> impl Iterator<Item = &MemoryBlock> {
        self.snapshot.blocks.iter()
    }

    fn defined_data(&self) -> impl Iterator<Item = &DataItem> {
        self.snapshot.data.iter()
    }

    fn references_to(&self, address: u64) -> impl Iterator<Item = u64> {
        self.references_to
            .get(&address)
            .into_iter()
            .flatten()
            .copied()
    }
}
