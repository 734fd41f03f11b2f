use crate::{get_program, Args, DumpStringsArgs};

use anyhow::Result;
use defined_strings::{build_report, ExportOptions};

pub fn dump_strings(args: &Args, dump_args: &DumpStringsArgs) -> Result<()> {
    let program = get_program(args)?;
    let options = ExportOptions {
        escape: dump_args.escape.into(),
    };
    let report = build_report(&program, &options)?;
    report.write(&mut std::io::stdout().lock())?;
    Ok(())
}
