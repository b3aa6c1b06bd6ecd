use clap::Parser;
use rotation_core::cli::{run, Args};

fn main() {
    let args = Args::parse();
    std::process::exit(run(args));
}
