//! Command-line interface for `t2sc`.
//!
//! Thin entry point; argument handling and the commands live in the library.

use std::process::ExitCode;

fn main() -> ExitCode {
    match t2sc::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("✗ {err:#}");
            if let Some(hint) = t2sc::hint_for(&err) {
                eprintln!("  {hint}");
            }
            ExitCode::FAILURE
        }
    }
}
