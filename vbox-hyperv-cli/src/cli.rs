use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{convert::ConvertArgs, destroy::DestroyArgs, render::RenderArgs};

/// Convert VirtualBox build output into a Hyper-V machine layout
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalFlags {
    /// Write logs to a daily-rotated file in this directory instead of stderr
    #[arg(long, global = true, env = "VBOX_HYPERV_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a VirtualBox artifact into a staged Hyper-V machine
    Convert(ConvertArgs),

    /// Print the machine descriptor for a name and disk path
    RenderDescriptor(RenderArgs),

    /// Remove a staged output directory
    Destroy(DestroyArgs),
}
