//! Scenetree CLI - Turn scene-graph structure dumps into diagrams

mod cli;
mod colorizer;

use clap::Parser;
use scenetree::core::logging::init_logging;

fn main() {
    let cli_args = cli::Cli::parse();

    // Flags win over SCENETREE_LOG_LEVEL / SCENETREE_LOG_FORMAT
    let level = cli_args.log_level.map(|level| level.as_str());
    let format = cli_args.log_format.map(|format| format.as_str());
    if let Err(e) = init_logging(level, format) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let mut app = match cli::ScenetreeApp::from_palette(cli_args.palette.as_deref()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
