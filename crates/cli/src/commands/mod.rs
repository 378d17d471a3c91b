//! Subcommands. Each exposes an `Args` struct and a `run` returning the exit
//! code.

pub mod attributes;
pub mod changes;
pub mod generate;
pub mod init_config;

/// Run `f`, printing its error to stderr. Returns the exit code.
pub fn run_cli<F>(f: F) -> i32
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}
