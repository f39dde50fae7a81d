use clap::Args;
use std::path::PathBuf;
use vbox_hyperv::StagingLayout;

#[derive(Args, Debug)]
pub struct DestroyArgs {
    /// Staged output directory to remove
    #[arg(long)]
    pub directory: PathBuf,
}

pub fn execute(args: DestroyArgs) -> anyhow::Result<()> {
    StagingLayout::new(&args.directory).remove()?;
    println!("{}", args.directory.display());
    Ok(())
}
