use anyhow::{anyhow, ensure, Context, Result};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use std::io::{Read, Write};

use crate::program::ProgramSnapshot;

const SNAPSHOT_MAGIC: [u8; 4] = *b"PSNP";
const SNAPSHOT_VERSION: u16 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SnapshotCompression {
    None = 0,
    Zlib = 2,
    Zstd = 3,
}

#[derive(Clone, Copy, Debug)]
struct SnapshotHeader {
    compression: SnapshotCompression,
    len: u64,
}

impl SnapshotHeader {
    fn read(input: &mut impl Read) -> Result<Self> {
        let mut magic = [0u8; 4];
        input.read_exact(&mut magic)?;
        ensure!(magic == SNAPSHOT_MAGIC, "Invalid program snapshot magic");
        let version: u16 = bincode::deserialize_from(&mut *input)?;
        ensure!(
            version == SNAPSHOT_VERSION,
            "Unsupported program snapshot version {version}"
        );
        let compression_raw: u8 = bincode::deserialize_from(&mut *input)?;
        let compression =
            SnapshotCompression::try_from_primitive(compression_raw)
                .map_err(|_| {
                    anyhow!("Invalid snapshot compression {compression_raw}")
                })?;
        let len: u64 = bincode::deserialize_from(&mut *input)?;
        Ok(Self { compression, len })
    }

    fn write(&self, output: &mut impl Write) -> Result<()> {
        output.write_all(&SNAPSHOT_MAGIC)?;
        bincode::serialize_into(&mut *output, &SNAPSHOT_VERSION)?;
        bincode::serialize_into(&mut *output, &u8::from(self.compression))?;
        bincode::serialize_into(&mut *output, &self.len)?;
        Ok(())
    }
}

impl ProgramSnapshot {
    /// Read a snapshot from its binary container.
    pub fn read(input: &mut impl Read) -> Result<Self> {
        let header = SnapshotHeader::read(&mut *input)?;
        // makes sure the reader doesn't go out-of-bounds
        let mut input = Read::take(input, header.len);
        let snapshot = match header.compression {
            SnapshotCompression::None => {
                let snapshot = bincode::deserialize_from(&mut input)?;
                ensure!(
                    input.limit() == 0,
                    "Snapshot have more data then expected, left {} bytes",
                    input.limit()
                );
                snapshot
            }
            SnapshotCompression::Zlib => {
                let input = flate2::read::ZlibDecoder::new(&mut input);
                bincode::deserialize_from(input)?
            }
            SnapshotCompression::Zstd => {
                let input = zstd::stream::read::Decoder::new(&mut input)?;
                bincode::deserialize_from(input)?
            }
        };
        Ok(snapshot)
    }

    pub fn write(
        &self,
        output: &mut impl Write,
        compression: SnapshotCompression,
    ) -> Result<()> {
        let raw = bincode::serialize(self)?;
        let data = match compression {
            SnapshotCompression::None => raw,
            SnapshotCompression::Zlib => {
                let mut encoder = flate2::write::ZlibEncoder::new(
                    vec![],
                    flate2::Compression::default(),
                );
                encoder.write_all(&raw)?;
                encoder.finish()?
            }
            SnapshotCompression::Zstd => zstd::stream::encode_all(&raw[..], 0)?,
        };
        let header = SnapshotHeader {
            compression,
            len: data.len().try_into()?,
        };
        header.write(&mut *output)?;
        output.write_all(&data)?;
        Ok(())
    }

    /// Parse the textual form of a snapshot, used for hand written inputs.
    pub fn from_yaml(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).context("Invalid YAML program snapshot")
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
