use clap::Parser;
use dicomwatch::app;
use dicomwatch::config::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    app::run(Cli::parse())
}
