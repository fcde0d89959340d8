//! Transcode CLI entry point.

#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

fn main() {
    if let Err(e) = transcode::run() {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
