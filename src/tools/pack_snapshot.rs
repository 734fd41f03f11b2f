use std::fs::File;
use std::io::{BufWriter, Write};

use crate::{read_snapshot, Args, PackSnapshotArgs};

use anyhow::Result;
use defined_strings::Program;

pub fn pack_snapshot(args: &Args, pack_args: &PackSnapshotArgs) -> Result<()> {
    let snapshot = read_snapshot(args)?;
    // reject inputs that can't be exported later
    let snapshot = Program::new(snapshot)?.into_snapshot();

    let mut output = BufWriter::new(File::create(&pack_args.output)?);
    snapshot.write(&mut output, pack_args.compression.into())?;
    output.flush()?;
    Ok(())
}
