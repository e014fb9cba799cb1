use clap::Parser;
use pricescope::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
