//! `nullobj` binary.

use std::process;

fn main() {
    nullobj_cli::init_tracing();
    process::exit(nullobj_cli::run(std::env::args().collect()));
}
