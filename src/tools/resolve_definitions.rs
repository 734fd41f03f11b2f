use crate::{get_program, Args, ResolveDefinitionsArgs};

use anyhow::{Context, Result};
use defined_strings::Report;
use tracing::warn;

pub fn resolve_definitions(
    args: &Args,
    resolve_args: &ResolveDefinitionsArgs,
) -> Result<()> {
    let program = get_program(args)?;
    let input = std::fs::read_to_string(&resolve_args.report)
        .with_context(|| {
            format!("Unable to read {}", resolve_args.report.display())
        })?;
    let report = Report::parse(&input)?;

    for definition in &report.definitions {
        // the report may be older than the program
        match program.data_at(definition.address) {
            Some(item) if item.len == definition.length => {}
            Some(item) => warn!(
                "String at {:#x} is {} bytes in the program, the report says {}",
                definition.address, item.len, definition.length
            ),
            None => warn!(
                "String at {:#x} is not defined in the program",
                definition.address
            ),
        }
        match report.file_position(definition.address) {
            Some(position) => println!(
                "{:#010x}: file {position:#x} {} bytes {}",
                definition.address, definition.length, definition.encoding
            ),
            None => println!(
                "{:#010x}: outside of the file layout",
                definition.address
            ),
        }
    }
    Ok(())
}
