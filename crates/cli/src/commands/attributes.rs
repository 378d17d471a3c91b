//! `nullobj attributes`: emit the marker attribute declarations.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use nullobj_core::attributes::{ATTRIBUTE_FILE_NAME, marker_source};
use nullobj_core::writer::DEFAULT_INDENT_WIDTH;

use super::run_cli;

/// Arguments of `nullobj attributes`.
#[derive(Args, Debug, Clone)]
pub struct AttributesArgs {
    /// Directory to write NullObjAttribute.cs into; prints to stdout when omitted
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out: Option<PathBuf>,
    /// Spaces per indentation level
    #[arg(long, default_value_t = DEFAULT_INDENT_WIDTH)]
    pub indent_width: usize,
}

/// Run `nullobj attributes`.
pub fn run(args: AttributesArgs) -> i32 {
    run_cli(|| run_inner(&args))
}

fn run_inner(args: &AttributesArgs) -> Result<(), String> {
    let source = marker_source(args.indent_width);
    match &args.out {
        None => {
            print!("{source}");
            Ok(())
        }
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|err| format!("Failed to create directory: {err}"))?;
            let path = dir.join(ATTRIBUTE_FILE_NAME);
            fs::write(&path, source)
                .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
            println!("wrote {}", path.display());
            Ok(())
        }
    }
}
