//! Command line front end for the null object generator.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod commands;

/// Environment variable controlling log output.
pub const LOG_ENV: &str = "NULLOBJ_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "nullobj",
    version,
    about = "Generate null object companions for annotated C# types"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate companions for every annotated type in a compilation model
    Generate(commands::generate::GenerateArgs),
    /// Print or write the marker attribute source
    Attributes(commands::attributes::AttributesArgs),
    /// Write a nullobj.toml with the default options
    InitConfig(commands::init_config::InitConfigArgs),
}

/// Parse `args` (including the program name) and run the selected command.
/// Returns the process exit code.
pub fn run(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => commands::generate::run(args),
            Some(Commands::Attributes(args)) => commands::attributes::run(args),
            Some(Commands::InitConfig(args)) => commands::init_config::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Install the stderr log subscriber.
///
/// `NULLOBJ_LOG` takes a plain level ("debug") applied to the generator
/// crates, or a full filter spec like "nullobj_core=trace,nullobj_cli=info".
pub fn init_tracing() {
    let filter = match std::env::var(LOG_ENV) {
        Ok(level) if is_plain_level(&level) => crate_filter(&level),
        Ok(spec) => spec,
        Err(_) => crate_filter("warn"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn crate_filter(level: &str) -> String {
    format!("nullobj_cli={level},nullobj_core={level}")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_plain_level() {
        assert!(is_plain_level("debug"));
        assert!(is_plain_level("WARN"));
        assert!(!is_plain_level("nullobj_core=debug"));
    }

    #[test]
    fn test_crate_filter_covers_both_crates() {
        assert_eq!(crate_filter("info"), "nullobj_cli=info,nullobj_core=info");
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        assert_ne!(run(vec!["nullobj".into(), "explode".into()]), 0);
    }
}
