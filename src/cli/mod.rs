use std::path::Path;

use anyhow::Result;
use edid::Edid;
use edid::process::load::Loader;

use crate::input::InputReader;
use command::Cli;

pub mod command;
pub mod dump;
pub mod info;

/// Reads `input` and loads it with the fail level selected on the command line.
pub fn load_input(input: &Path, cli: &Cli) -> Result<Edid> {
    let mut reader = InputReader::new(input)?;
    let bytes = reader.read_all()?;

    let source = if reader.is_pipe() {
        "stdin".to_string()
    } else {
        input.display().to_string()
    };
    log::info!("Loading EDID from {source}: {} byte(s)", bytes.len());

    let mut loader = Loader::default();
    loader.set_fail_level(cli.fail_level());
    loader.load(&bytes)
}
