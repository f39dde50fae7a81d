//! Entry point for the `vbox-hyperv` command line.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let guard = match vbox_hyperv::init_logging(cli.global.log_dir.as_deref()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let result = match cli.command {
        Commands::Convert(args) => commands::convert::execute(args).await,
        Commands::RenderDescriptor(args) => commands::render::execute(args),
        Commands::Destroy(args) => commands::destroy::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        // Flush file logs before exiting.
        drop(guard);
        std::process::exit(1);
    }
}
