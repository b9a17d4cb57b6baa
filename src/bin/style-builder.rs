use anyhow::{Context, Result};
use style_builder::cli::{self, Command};
use style_builder::Platform;

fn main() -> Result<()> {
    cli::init_logging();
    println!("{}", cli::ALPHA_WARNING);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let platform = Platform::detect();
    let work_dir = std::env::current_dir().context("resolving current directory")?;

    cli::run(command, &work_dir, platform)
}
