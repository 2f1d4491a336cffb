//! leadschema CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Failures have already
//! been reported on stdout; they are echoed to stderr and the process exits
//! non-zero.

use leadschema::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
