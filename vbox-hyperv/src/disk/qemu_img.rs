//! qemu-img driver.
//!
//! Alternative converter for hosts without VirtualBox installed:
//! `qemu-img convert -f vmdk -O vpc <src> <dst>`.

use super::{ConversionRequest, DiskConverter, DiskFormat};
use crate::errors::{ConvertError, ConvertResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct QemuImgConverter {
    binary: PathBuf,
}

impl QemuImgConverter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn convert_args(request: &ConversionRequest) -> Vec<std::ffi::OsString> {
        vec![
            "convert".into(),
            "-f".into(),
            DiskFormat::SOURCE.qemu_img_format().into(),
            "-O".into(),
            request.format.qemu_img_format().into(),
            request.source.clone().into_os_string(),
            request.destination.clone().into_os_string(),
        ]
    }
}

#[async_trait]
impl DiskConverter for QemuImgConverter {
    async fn convert(&self, request: &ConversionRequest) -> ConvertResult<()> {
        tracing::info!(
            source = %request.source.display(),
            destination = %request.destination.display(),
            format = request.format.qemu_img_format(),
            "Converting disk with qemu-img"
        );

        let output = Command::new(&self.binary)
            .args(Self::convert_args(request))
            .output()
            .await
            .map_err(|e| {
                ConvertError::ConversionFailed(format!(
                    "failed to run qemu-img (is it installed?) at {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(ConvertError::ConversionFailed(format!(
                "failed to convert {} to {}: {}",
                request.source.display(),
                request.destination.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "qemu-img"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_args() {
        let request = ConversionRequest {
            source: PathBuf::from("/x/disk.vmdk"),
            destination: PathBuf::from("/out/disk.vhd"),
            format: DiskFormat::Vhd,
        };
        let args: Vec<_> = QemuImgConverter::convert_args(&request)
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["convert", "-f", "vmdk", "-O", "vpc", "/x/disk.vmdk", "/out/disk.vhd"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_conversion_failure() {
        let converter = QemuImgConverter::new("/bin/false");
        let request = ConversionRequest {
            source: PathBuf::from("/x/disk.vmdk"),
            destination: PathBuf::from("/tmp/never-written.vhd"),
            format: DiskFormat::Vhd,
        };
        let err = converter.convert(&request).await.unwrap_err();
        assert!(matches!(err, ConvertError::ConversionFailed(_)));
    }
}
