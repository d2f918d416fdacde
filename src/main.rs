use cliproc::{Cli, ExitCode};
use pydep::commands::pydep::Pydep;
use std::env;

fn main() -> ExitCode {
    Cli::default().parse(env::args()).go::<Pydep>()
}
