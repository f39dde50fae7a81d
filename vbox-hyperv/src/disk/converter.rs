//! Format Converter boundary.
//!
//! The pipeline only sees the `DiskConverter` capability. Drivers for the
//! external tools live next to this module; tests substitute their own.

use super::{DiskFormat, QemuImgConverter, VBoxManageConverter};
use crate::errors::ConvertResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// One disk conversion, created per pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Absolute path to the source disk.
    pub source: PathBuf,
    /// Absolute path the converted disk is written to.
    pub destination: PathBuf,
    /// Target disk format.
    pub format: DiskFormat,
}

/// Capability that turns a source disk into a target-format disk.
///
/// Implementations block the caller until the conversion finishes. No
/// cleanup of `destination` is expected on failure.
#[async_trait]
pub trait DiskConverter: Send + Sync {
    async fn convert(&self, request: &ConversionRequest) -> ConvertResult<()>;

    /// Human-readable driver name for logging.
    fn name(&self) -> &str;
}

/// Which external tool performs the conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConverterKind {
    #[default]
    #[serde(rename = "vboxmanage")]
    VBoxManage,
    QemuImg,
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConverterKind::VBoxManage => write!(f, "vboxmanage"),
            ConverterKind::QemuImg => write!(f, "qemu-img"),
        }
    }
}

/// Build the driver for `kind`, locating its executable.
///
/// `explicit_path` bypasses discovery.
pub fn converter_for(
    kind: ConverterKind,
    explicit_path: Option<PathBuf>,
) -> ConvertResult<Arc<dyn DiskConverter>> {
    Ok(match kind {
        ConverterKind::VBoxManage => {
            let binary = match explicit_path {
                Some(path) => path,
                None => crate::util::find_vboxmanage()?,
            };
            Arc::new(VBoxManageConverter::new(binary))
        }
        ConverterKind::QemuImg => {
            let binary = match explicit_path {
                Some(path) => path,
                None => crate::util::find_binary(crate::constants::binaries::QEMU_IMG)?,
            };
            Arc::new(QemuImgConverter::new(binary))
        }
    })
}
