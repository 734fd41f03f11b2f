//! CLI integration tests for defined-strings-tools.

use std::path::PathBuf;
use std::process::Command;

fn tools_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_defined-strings-tools"))
}

fn temp_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "defined_strings_cli_{}_{name}",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

const RODATA_PROGRAM: &str = r#"
blocks:
  - name: .rodata
    start: 0x1000
    len: 0x100
    sources:
      - file_offset: 0x200
        len: 0x100
data:
  - address: 0x1010
    len: 3
    value: Hi
    data_type:
      name: string
      string:
        tag: TerminatedCString
references:
  - from: 0x2000
    to: 0x1010
"#;

const RODATA_REPORT: &str = "\
offset:
  - name: .rodata
    ram: 0x1000
    file: 0x200

definitions:
  # Hi
  - address: 0x1010
    size: 3
    encoding: ascii
    pointers:
      - 0x2000

";

fn write_program(name: &str, content: &str) -> PathBuf {
    let path = temp_path(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cli_help() {
    let output = tools_cmd()
        .arg("--help")
        .output()
        .expect("Failed to execute defined-strings-tools");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("export-strings"));
    assert!(stdout.contains("--input"));
}

#[test]
fn test_cli_export_strings() {
    let input = write_program("export.yaml", RODATA_PROGRAM);
    let report = temp_path("export_report.yaml");

    let output = tools_cmd()
        .arg("-i")
        .arg(&input)
        .arg("export-strings")
        .arg(&report)
        .output()
        .expect("Failed to execute defined-strings-tools");

    assert!(output.status.success());
    assert_eq!(std::fs::read_to_string(&report).unwrap(), RODATA_REPORT);
}

#[test]
fn test_cli_export_without_output() {
    let input = write_program("usage.yaml", RODATA_PROGRAM);

    let output = tools_cmd()
        .arg("-i")
        .arg(&input)
        .arg("export-strings")
        .output()
        .expect("Failed to execute defined-strings-tools");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("USAGE").count(), 1);
}

#[test]
fn test_cli_export_multi_source_segment() {
    let program = RODATA_PROGRAM.replace(
        "      - file_offset: 0x200\n        len: 0x100\n",
        "      - file_offset: 0x200\n        len: 0x80\n      - file_offset: 0x800\n        len: 0x80\n",
    );
    let input = write_program("multi_source.yaml", &program);
    let report = temp_path("multi_source_report.yaml");

    let output = tools_cmd()
        .arg("-i")
        .arg(&input)
        .arg("export-strings")
        .arg(&report)
        .output()
        .expect("Failed to execute defined-strings-tools");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(".rodata"));
    assert!(!report.exists());
}

#[test]
fn test_cli_packed_snapshot_exports_the_same() {
    let input = write_program("pack.yaml", RODATA_PROGRAM);
    let packed = temp_path("pack.psnp");
    let report = temp_path("pack_report.yaml");

    let output = tools_cmd()
        .arg("-i")
        .arg(&input)
        .arg("pack-snapshot")
        .arg(&packed)
        .output()
        .expect("Failed to execute defined-strings-tools");
    assert!(output.status.success());

    let output = tools_cmd()
        .arg("-i")
        .arg(&packed)
        .arg("export-strings")
        .arg(&report)
        .output()
        .expect("Failed to execute defined-strings-tools");
    assert!(output.status.success());
    assert_eq!(std::fs::read_to_string(&report).unwrap(), RODATA_REPORT);
}

#[test]
fn test_cli_resolve_definitions() {
    let input = write_program("resolve.yaml", RODATA_PROGRAM);
    let report = temp_path("resolve_report.yaml");
    std::fs::write(&report, RODATA_REPORT).unwrap();

    let output = tools_cmd()
        .arg("-i")
        .arg(&input)
        .arg("resolve-definitions")
        .arg(&report)
        .output()
        .expect("Failed to execute defined-strings-tools");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0x00001010: file 0x210 3 bytes ascii"));
}

#[test]
fn test_cli_dump_strings() {
    let input = write_program("dump.yaml", RODATA_PROGRAM);

    let output = tools_cmd()
        .arg("-i")
        .arg(&input)
        .arg("dump-strings")
        .output()
        .expect("Failed to execute defined-strings-tools");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), RODATA_REPORT);
}

#[test]
fn test_cli_dump_segments() {
    let input = write_program("segments.yaml", RODATA_PROGRAM);

    let output = tools_cmd()
        .arg("-i")
        .arg(&input)
        .arg("dump-segments")
        .output()
        .expect("Failed to execute defined-strings-tools");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("  .rodata 0x1000+0x100: file 0x200+0x100\n"));
    assert!(stdout.contains("  .rodata ram 0x1000 file 0x200\n"));
}

#[test]
fn test_cli_export_escape_control() {
    let program = RODATA_PROGRAM.replace("value: Hi", "value: \"H\\ti\\a\"");
    let input = write_program("escape.yaml", &program);
    let report = temp_path("escape_report.yaml");

    let output = tools_cmd()
        .arg("-i")
        .arg(&input)
        .arg("export-strings")
        .arg("--escape")
        .arg("control")
        .arg(&report)
        .output()
        .expect("Failed to execute defined-strings-tools");

    assert!(output.status.success());
    let expected = RODATA_REPORT.replace("  # Hi\n", "  # H\\ti\\x07\n");
    assert_eq!(std::fs::read_to_string(&report).unwrap(), expected);
}
