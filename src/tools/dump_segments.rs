use crate::{get_program, Args};

use anyhow::Result;
use defined_strings::{extract_layout, ProgramModel};

pub fn dump_segments(args: &Args) -> Result<()> {
    let program = get_program(args)?;

    println!("Memory blocks: ");
    for block in program.memory_blocks() {
        print!("  {} {:#x}+{:#x}:", block.name, block.start, block.len);
        for source in &block.sources {
            print!(" file {:#x}+{:#x}", source.file_offset, source.len);
        }
        println!();
    }

    println!();
    println!("Layout: ");
    for segment in extract_layout(&program)? {
        println!(
            "  {} ram {:#x} file {:#x}",
            segment.name, segment.base_address, segment.file_offset
        );
    }
    Ok(())
}
