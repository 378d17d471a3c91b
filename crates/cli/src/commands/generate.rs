//! `nullobj generate`: run the pipeline and sync the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use nullobj_core::attributes::{ATTRIBUTE_FILE_NAME, marker_source};
use nullobj_core::config::CONFIG_FILE_NAME;
use nullobj_core::{
    CollectingSink, Compilation, Diagnostic, GeneratedSource, GeneratorOptions, Severity,
    generate,
};
use tracing::{debug, info};

use super::changes::{
    apply_changes, collect_file_changes, collect_stale_files, remove_stale_files,
};
use super::run_cli;

/// Arguments of `nullobj generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Compilation model (JSON) to read
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: PathBuf,
    /// Directory generated files are written to
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out: PathBuf,
    /// Options file [default: nullobj.toml next to the input, if present]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Show what would change without writing; fail if anything is out of date
    #[arg(long)]
    pub check: bool,
    /// Do not emit the marker attribute source
    #[arg(long)]
    pub no_attributes: bool,
}

/// Run `nullobj generate`.
pub fn run(args: GenerateArgs) -> i32 {
    run_cli(|| run_inner(&args))
}

fn run_inner(args: &GenerateArgs) -> Result<(), String> {
    let options = load_options(args.config.as_deref(), &args.input)?;

    let json = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read {}: {err}", args.input.display()))?;
    let compilation = Compilation::from_json(&json)?;
    debug!(
        types = compilation.types.len(),
        units = compilation.units.len(),
        "loaded compilation model"
    );

    let sink = CollectingSink::new();
    let mut sources = generate(&compilation, &options, &sink);
    let diagnostics = sink.drain();
    for diagnostic in &diagnostics {
        eprintln!("{}", render_diagnostic(diagnostic));
    }

    if !args.no_attributes {
        sources.insert(
            0,
            GeneratedSource {
                file_name: ATTRIBUTE_FILE_NAME.to_string(),
                text: marker_source(options.indent_width),
            },
        );
    }

    let changes = collect_file_changes(&args.out, &sources)?;
    let stale_files = collect_stale_files(&args.out, &options.file_name_suffix(), &sources)?;
    let new_files: Vec<_> = changes.iter().filter(|c| c.is_new()).collect();
    let modified_files: Vec<_> = changes.iter().filter(|c| c.is_modified()).collect();
    let unchanged_count = changes.len() - new_files.len() - modified_files.len();

    if !new_files.is_empty() {
        println!("{}", style("Files to be created:").green());
        for file in &new_files {
            println!("  {} {}", style("+").green(), file.rel_path);
        }
        println!();
    }

    if !modified_files.is_empty() {
        println!("{}", style("Files to be modified:").yellow());
        for file in &modified_files {
            println!("  {} {}", style("~").yellow(), file.rel_path);
        }
        println!();

        if args.check {
            for file in &modified_files {
                if let Some(diff) = file.generate_diff() {
                    println!("{diff}");
                }
            }
        }
    }

    if !stale_files.is_empty() {
        println!("{}", style("Files to be removed:").red());
        for file in &stale_files {
            println!("  {} {}", style("-").red(), file);
        }
        println!();
    }

    println!(
        "Summary: {} new, {} modified, {} removed, {} unchanged",
        new_files.len(),
        modified_files.len(),
        stale_files.len(),
        unchanged_count
    );

    let out_of_date = new_files.len() + modified_files.len() + stale_files.len();
    if args.check {
        if out_of_date > 0 {
            return Err(format!("{out_of_date} generated file(s) out of date"));
        }
    } else if out_of_date > 0 {
        let (created, modified) = apply_changes(&args.out, &changes)?;
        let removed = remove_stale_files(&args.out, &stale_files)?;
        info!(created, modified, removed, out = %args.out.display(), "wrote generated files");
        println!(
            "{} {} file(s) created, {} file(s) modified, {} file(s) removed",
            style("✓").green(),
            created,
            modified,
            removed
        );
    }

    let errors = diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity() == Severity::Error)
        .count();
    if errors > 0 {
        return Err(format!("{errors} target(s) failed to generate"));
    }
    Ok(())
}

/// Explicit `--config`, else `nullobj.toml` beside the input, else defaults.
fn load_options(config: Option<&Path>, input: &Path) -> Result<GeneratorOptions, String> {
    let path = match config {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = input
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(CONFIG_FILE_NAME);
            if !candidate.exists() {
                debug!("no {CONFIG_FILE_NAME} found; using default options");
                return Ok(GeneratorOptions::default());
            }
            candidate
        }
    };
    debug!(path = %path.display(), "loading options");
    GeneratorOptions::load(&path).map_err(|err| err.to_string())
}

fn render_diagnostic(diagnostic: &Diagnostic) -> String {
    let styled = style(diagnostic.to_string()).for_stderr();
    match diagnostic.severity() {
        Severity::Error => styled.red().to_string(),
        Severity::Warning => styled.yellow().to_string(),
        Severity::Info => styled.dim().to_string(),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_options_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = load_options(None, &dir.path().join("model.json")).unwrap();
        assert_eq!(options, GeneratorOptions::default());
    }

    #[test]
    fn test_load_options_picks_up_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "type_suffix = \"Null\"\n").unwrap();
        let options = load_options(None, &dir.path().join("model.json")).unwrap();
        assert_eq!(options.type_suffix, "Null");
    }

    #[test]
    fn test_load_options_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_options(Some(dir.path().join("missing.toml").as_path()), Path::new("model.json"))
            .unwrap_err();
        assert!(err.starts_with("failed to read config file"));
    }
}
