//! `nullobj init-config`: write the default options file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use nullobj_core::GeneratorOptions;
use nullobj_core::config::CONFIG_FILE_NAME;

use super::run_cli;

/// Arguments of `nullobj init-config`.
#[derive(Args, Debug, Clone)]
pub struct InitConfigArgs {
    /// Where to write the options file
    #[arg(long, short = 'o', value_name = "FILE", default_value = CONFIG_FILE_NAME)]
    pub out: PathBuf,
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Run `nullobj init-config`.
pub fn run(args: InitConfigArgs) -> i32 {
    run_cli(|| run_inner(&args))
}

fn run_inner(args: &InitConfigArgs) -> Result<(), String> {
    if args.out.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            args.out.display()
        ));
    }
    let contents = GeneratorOptions::default()
        .to_toml_string()
        .map_err(|err| err.to_string())?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| format!("Failed to create directory: {err}"))?;
    }
    fs::write(&args.out, contents)
        .map_err(|err| format!("Failed to write {}: {err}", args.out.display()))?;
    println!("wrote {}", args.out.display());
    Ok(())
}
