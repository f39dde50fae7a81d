use clap::Args;
use std::io::Write;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Machine name written into the descriptor
    #[arg(long)]
    pub vm_name: String,

    /// Disk path written into the descriptor
    #[arg(long)]
    pub disk_path: String,
}

pub fn execute(args: RenderArgs) -> anyhow::Result<()> {
    let descriptor = vbox_hyperv::render_vm_xml(&args.vm_name, &args.disk_path);
    std::io::stdout().write_all(&descriptor)?;
    Ok(())
}
