use std::process::ExitCode;

use anyhow::Result;

fn main() -> Result<ExitCode> {
    cricket_roster::cli::main()
}
