// src/main.rs
use clap::Parser;
use code_aggregator::cli::{self, Cli};

fn main() {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // Usage errors exit with 1 instead of clap's 2
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(err) = cli::run(args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
