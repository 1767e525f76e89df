//! Binary entrypoint for the imgconv CLI.

use std::process;

fn main() {
    process::exit(imgconv_cli::run());
}
