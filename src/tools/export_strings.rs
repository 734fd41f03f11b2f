use crate::{get_program, Args, ExportStringsArgs};

use anyhow::Result;
use defined_strings::{
    export_defined_strings, ExportOptions, ExportOutcome, USAGE,
};

pub fn export_strings(args: &Args, export_args: &ExportStringsArgs) -> Result<()> {
    let program = get_program(args)?;
    let options = ExportOptions {
        escape: export_args.escape.into(),
    };
    match export_defined_strings(&program, &export_args.args, &options)? {
        ExportOutcome::Usage => println!("{USAGE}"),
        ExportOutcome::Exported {
            segments,
            definitions,
        } => println!(
            "Exported {segments} segments and {definitions} strings into {}",
            export_args.args[0]
        ),
    }
    Ok(())
}
