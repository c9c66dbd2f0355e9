use anyhow::{Context, Result};
use edid::structs::block::BLOCK_SIZE;

use super::command::{Cli, DumpArgs};
use super::load_input;

const ROW_SIZE: usize = 16;

pub fn cmd_dump(args: &DumpArgs, cli: &Cli) -> Result<()> {
    let edid = load_input(&args.input, cli)?;

    let mut buffer = vec![0u8; BLOCK_SIZE * edid.segments() as usize];
    let written = edid.raw(&mut buffer);
    buffer.truncate(written);

    if written == 0 {
        log::warn!("Nothing to dump: missing EDID header");
        return Ok(());
    }

    for (segment, block) in buffer.chunks(BLOCK_SIZE).enumerate() {
        println!("Block {segment}:");
        for row in hex_rows(block) {
            println!("  {row}");
        }
    }

    if let Some(output) = &args.output {
        std::fs::write(output, &buffer)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        log::info!("Wrote {written} byte(s) to {}", output.display());
    }

    Ok(())
}

/// Formats `block` as rows of 16 bytes prefixed with their offset.
fn hex_rows(block: &[u8]) -> Vec<String> {
    block
        .chunks(ROW_SIZE)
        .enumerate()
        .map(|(row, bytes)| {
            let hex: Vec<String> = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
            format!("{:02X}: {}", row * ROW_SIZE, hex.join(" "))
        })
        .collect()
}

#[test]
fn rows() {
    use edid::process::EXAMPLE_DATA;

    let rows = hex_rows(&EXAMPLE_DATA[..BLOCK_SIZE]);
    assert_eq!(rows.len(), 8);
    assert_eq!(
        rows[0],
        "00: 00 FF FF FF FF FF FF 00 4C 2D 10 0F 0D 0C 0B 0A"
    );
    assert!(rows[7].starts_with("70: 00 48 34"));

    assert_eq!(hex_rows(&[0x02, 0x03]), ["00: 02 03"]);
}
