use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use vbox_hyperv::constants::producers;
use vbox_hyperv::{
    Artifact, ConvertOptions, ConverterKind, PassthroughPackaging, PostProcessor,
};

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ConverterArg {
    Vboxmanage,
    QemuImg,
}

impl From<ConverterArg> for ConverterKind {
    fn from(arg: ConverterArg) -> Self {
        match arg {
            ConverterArg::Vboxmanage => ConverterKind::VBoxManage,
            ConverterArg::QemuImg => ConverterKind::QemuImg,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Producer tag of the input artifact
    #[arg(long, default_value = producers::VIRTUALBOX)]
    pub builder_id: String,

    /// File belonging to the input artifact (repeatable, order is kept)
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Name of the build that produced the artifact
    #[arg(long)]
    pub build_name: Option<String>,

    /// Staging directory [default: output-<build>-hyperv]
    #[arg(long)]
    pub staging_directory: Option<PathBuf>,

    /// Machine name [default: packer-<build>-<init time>]
    #[arg(long)]
    pub vm_name: Option<String>,

    /// Converted disk file stem [default: packer-<build>-<init time>]
    #[arg(long)]
    pub disk_name: Option<String>,

    /// Tool used for the disk conversion
    #[arg(long, value_enum)]
    pub converter: Option<ConverterArg>,

    /// Converter executable, skipping discovery
    #[arg(long)]
    pub converter_path: Option<PathBuf>,

    /// JSON options file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Initialization time in unix seconds, used for default names [default: now]
    #[arg(long)]
    pub init_time: Option<i64>,
}

impl ConvertArgs {
    fn options(&self) -> anyhow::Result<ConvertOptions> {
        let mut options = match &self.config {
            Some(path) => ConvertOptions::from_json_file(path)?,
            None => ConvertOptions::default(),
        };

        if let Some(build_name) = &self.build_name {
            options.packer_build_name = build_name.clone();
        }
        if let Some(dir) = &self.staging_directory {
            options.staging_directory = Some(dir.clone());
        }
        if let Some(vm_name) = &self.vm_name {
            options.vm_name = Some(vm_name.clone());
        }
        if let Some(disk_name) = &self.disk_name {
            options.disk_name = Some(disk_name.clone());
        }
        if let Some(converter) = self.converter {
            options.converter = converter.into();
        }
        if let Some(path) = &self.converter_path {
            options.converter_path = Some(path.clone());
        }

        Ok(options)
    }

    fn init_time(&self) -> anyhow::Result<DateTime<Utc>> {
        match self.init_time {
            Some(secs) => Utc
                .timestamp_opt(secs, 0)
                .single()
                .with_context(|| format!("invalid --init-time: {}", secs)),
            None => Ok(Utc::now()),
        }
    }
}

pub async fn execute(args: ConvertArgs) -> anyhow::Result<()> {
    let config = args.options()?.resolve(args.init_time()?)?;
    config.preflight()?;

    let processor = PostProcessor::from_config(config, Arc::new(PassthroughPackaging))?;
    let input = Artifact::new(args.builder_id, args.files);

    let report = processor.run(input).await;
    tracing::debug!(run_id = %report.run_id, state = %report.state, "Run finished");
    let packaged = report.result?;

    println!("{}", serde_json::to_string_pretty(&packaged.artifact)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ConvertArgs,
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("opts.json");
        std::fs::write(
            &path,
            r#"{"packer_build_name": "file", "vm_name": "from-file", "disk_name": "disk"}"#,
        )
        .unwrap();

        let wrapper = Wrapper::parse_from([
            "test",
            "--config",
            path.to_str().unwrap(),
            "--vm-name",
            "from-flag",
            "--converter",
            "qemu-img",
        ]);
        let options = wrapper.args.options().unwrap();

        assert_eq!(options.packer_build_name, "file");
        assert_eq!(options.vm_name.as_deref(), Some("from-flag"));
        assert_eq!(options.disk_name.as_deref(), Some("disk"));
        assert_eq!(options.converter, ConverterKind::QemuImg);
    }

    #[test]
    fn test_init_time_flag() {
        let wrapper = Wrapper::parse_from(["test", "--init-time", "1700000000"]);
        assert_eq!(wrapper.args.init_time().unwrap().timestamp(), 1_700_000_000);
        assert_eq!(wrapper.args.builder_id, producers::VIRTUALBOX);
    }
}
