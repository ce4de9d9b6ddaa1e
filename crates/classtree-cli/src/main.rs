//! Classtree CLI - Browse LinkML class hierarchies as trees

mod cli;
mod colorizer;
mod render;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Logging is initialized in run() once CLI flags and env vars are known
    let mut app = cli::ClasstreeApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
