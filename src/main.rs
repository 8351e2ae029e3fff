//! Shotlist CLI - checklists for video-production scripts

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = shotlist::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
