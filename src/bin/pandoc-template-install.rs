use anyhow::{bail, Result};
use std::path::PathBuf;
use style_builder::template::{self, TemplateInstaller};
use style_builder::HostFamily;

const DEFAULT_SOURCE_DIR: &str = "pandoc";

fn usage() -> &'static str {
    "Usage:\n  pandoc-template-install [SOURCE_DIR]\n\nSOURCE_DIR defaults to './pandoc'."
}

fn main() -> Result<()> {
    style_builder::cli::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let source_dir = match args.as_slice() {
        [] => PathBuf::from(DEFAULT_SOURCE_DIR),
        [flag] if flag == "-h" || flag == "--help" => {
            println!("{}", usage());
            return Ok(());
        }
        [dir] => PathBuf::from(dir),
        _ => bail!(usage()),
    };

    let data_dir = template::user_data_dir(HostFamily::current())?;
    TemplateInstaller::new(source_dir, data_dir).install()?;

    println!("\n{}\n", template::usage_hint());
    Ok(())
}
