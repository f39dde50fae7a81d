//! Conversion configuration.
//!
//! `ConvertOptions` is what the operator supplies; `ResolvedConfig` is the
//! immutable result after defaults are applied. Defaults depend on an
//! explicit initialization timestamp so they are reproducible.

use crate::disk::ConverterKind;
use crate::errors::{ConvertError, ConvertResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User-supplied options, before defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Name of the build that produced the input artifact.
    pub packer_build_name: String,
    /// Staging directory. Default: `output-<build>-hyperv`.
    pub staging_directory: Option<PathBuf>,
    /// Machine name in the descriptor. Default: `packer-<build>-<init unix time>`.
    pub vm_name: Option<String>,
    /// Converted disk file stem. Default: `packer-<build>-<init unix time>`.
    pub disk_name: Option<String>,
    /// External tool used for the disk conversion.
    pub converter: ConverterKind,
    /// Explicit converter executable, skipping discovery.
    pub converter_path: Option<PathBuf>,
}

impl ConvertOptions {
    pub fn new(build_name: impl Into<String>) -> Self {
        Self {
            packer_build_name: build_name.into(),
            ..Default::default()
        }
    }

    /// Load options from a JSON file.
    pub fn from_json_file(path: &Path) -> ConvertResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ConvertError::Config(format!("invalid configuration in {}: {}", path.display(), e))
        })
    }

    /// Apply defaults.
    ///
    /// Empty strings count as not supplied.
    pub fn resolve(self, init_time: DateTime<Utc>) -> ConvertResult<ResolvedConfig> {
        let build_name = self.packer_build_name.trim().to_string();
        if build_name.is_empty() {
            return Err(ConvertError::Config("packer_build_name is required".into()));
        }

        let default_name = format!("packer-{}-{}", build_name, init_time.timestamp());

        let staging_directory = self
            .staging_directory
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(format!("output-{}-hyperv", build_name)));
        let vm_name = non_empty(self.vm_name).unwrap_or_else(|| default_name.clone());
        let disk_name = non_empty(self.disk_name).unwrap_or(default_name);

        Ok(ResolvedConfig {
            staging_directory,
            vm_name,
            disk_name,
            converter: self.converter,
            converter_path: self.converter_path,
            init_time,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Configuration after defaults, read-only for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    staging_directory: PathBuf,
    vm_name: String,
    disk_name: String,
    converter: ConverterKind,
    converter_path: Option<PathBuf>,
    init_time: DateTime<Utc>,
}

impl ResolvedConfig {
    pub fn staging_directory(&self) -> &Path {
        &self.staging_directory
    }

    pub fn vm_name(&self) -> &str {
        &self.vm_name
    }

    pub fn disk_name(&self) -> &str {
        &self.disk_name
    }

    pub fn converter(&self) -> ConverterKind {
        self.converter
    }

    pub fn converter_path(&self) -> Option<&Path> {
        self.converter_path.as_deref()
    }

    pub fn init_time(&self) -> DateTime<Utc> {
        self.init_time
    }

    /// Configure-time checks, run before any work.
    ///
    /// Rejects a staging directory left behind by an earlier run.
    pub fn preflight(&self) -> ConvertResult<()> {
        if self.staging_directory.exists() {
            return Err(ConvertError::AlreadyExists(format!(
                "staging directory '{}' already exists",
                self.staging_directory.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn init_time() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_defaults_from_build_name() {
        let config = ConvertOptions::new("demo").resolve(init_time()).unwrap();

        assert_eq!(config.staging_directory(), Path::new("output-demo-hyperv"));
        assert_eq!(config.vm_name(), "packer-demo-1700000000");
        assert_eq!(config.disk_name(), "packer-demo-1700000000");
        assert_eq!(config.converter(), ConverterKind::VBoxManage);
        assert_eq!(config.init_time(), init_time());
    }

    #[test]
    fn test_explicit_values_win() {
        let options = ConvertOptions {
            packer_build_name: "demo".into(),
            staging_directory: Some(PathBuf::from("/builds/hv")),
            vm_name: Some("web".into()),
            disk_name: Some("web-disk".into()),
            converter: ConverterKind::QemuImg,
            converter_path: Some(PathBuf::from("/usr/bin/qemu-img")),
        };
        let config = options.resolve(init_time()).unwrap();

        assert_eq!(config.staging_directory(), Path::new("/builds/hv"));
        assert_eq!(config.vm_name(), "web");
        assert_eq!(config.disk_name(), "web-disk");
        assert_eq!(config.converter(), ConverterKind::QemuImg);
        assert_eq!(config.converter_path(), Some(Path::new("/usr/bin/qemu-img")));
    }

    #[test]
    fn test_empty_strings_use_defaults() {
        let options = ConvertOptions {
            packer_build_name: "demo".into(),
            staging_directory: Some(PathBuf::new()),
            vm_name: Some(String::new()),
            disk_name: Some("  ".into()),
            ..Default::default()
        };
        let config = options.resolve(init_time()).unwrap();

        assert_eq!(config.staging_directory(), Path::new("output-demo-hyperv"));
        assert_eq!(config.vm_name(), "packer-demo-1700000000");
        assert_eq!(config.disk_name(), "packer-demo-1700000000");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let a = ConvertOptions::new("demo").resolve(init_time()).unwrap();
        let b = ConvertOptions::new("demo").resolve(init_time()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_build_name_is_config_error() {
        let err = ConvertOptions::default().resolve(init_time()).unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn test_preflight_rejects_existing_staging_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = ConvertOptions {
            packer_build_name: "demo".into(),
            staging_directory: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let config = options.resolve(init_time()).unwrap();
        assert!(matches!(
            config.preflight(),
            Err(ConvertError::AlreadyExists(_))
        ));

        let options = ConvertOptions {
            packer_build_name: "demo".into(),
            staging_directory: Some(temp.path().join("fresh")),
            ..Default::default()
        };
        assert!(options.resolve(init_time()).unwrap().preflight().is_ok());
    }

    #[test]
    fn test_json_file_loading() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("hyperv.json");
        std::fs::write(
            &path,
            r#"{"packer_build_name": "demo", "vm_name": "web", "converter": "qemu-img"}"#,
        )
        .unwrap();

        let options = ConvertOptions::from_json_file(&path).unwrap();
        assert_eq!(options.packer_build_name, "demo");
        assert_eq!(options.vm_name.as_deref(), Some("web"));
        assert_eq!(options.converter, ConverterKind::QemuImg);
        assert!(options.staging_directory.is_none());
    }

    #[test]
    fn test_json_file_rejects_garbage() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            ConvertOptions::from_json_file(&path),
            Err(ConvertError::Config(_))
        ));
    }
}
