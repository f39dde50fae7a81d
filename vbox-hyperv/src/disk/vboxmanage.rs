//! VBoxManage driver.
//!
//! Converts disks with `VBoxManage clonehd <src> <dst> --format <fmt>`.

use super::{ConversionRequest, DiskConverter};
use crate::errors::{ConvertError, ConvertResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Output;
use tokio::process::Command;

/// Runs conversions through an already-located `VBoxManage` executable.
#[derive(Debug, Clone)]
pub struct VBoxManageConverter {
    binary: PathBuf,
}

impl VBoxManageConverter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments for a `clonehd` invocation.
    pub fn clonehd_args(request: &ConversionRequest) -> Vec<std::ffi::OsString> {
        vec![
            "clonehd".into(),
            request.source.clone().into_os_string(),
            request.destination.clone().into_os_string(),
            "--format".into(),
            request.format.vboxmanage_format().into(),
        ]
    }

    /// Run VBoxManage with `args` and wait for it to exit.
    pub async fn run(&self, args: &[std::ffi::OsString]) -> ConvertResult<Output> {
        tracing::debug!(binary = %self.binary.display(), ?args, "Executing VBoxManage");

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                ConvertError::ConversionFailed(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(stdout = %stdout.trim(), stderr = %stderr.trim(), "VBoxManage finished");

        if !output.status.success() {
            return Err(ConvertError::ConversionFailed(format!(
                "VBoxManage exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // VBoxManage may exit zero after printing an error.
        if let Some(line) = error_line(&stderr) {
            return Err(ConvertError::ConversionFailed(format!(
                "VBoxManage reported an error: {}",
                line
            )));
        }

        Ok(output)
    }
}

/// First stderr line of the form `VBoxManage[.exe]: error: ...`.
fn error_line(stderr: &str) -> Option<&str> {
    stderr.lines().map(str::trim).find(|line| {
        line.strip_prefix("VBoxManage")
            .and_then(|rest| rest.split_once(':'))
            .is_some_and(|(prefix, rest)| {
                prefix.chars().all(|c| c == '.' || c.is_ascii_lowercase())
                    && rest.trim_start().starts_with("error:")
            })
    })
}

#[async_trait]
impl DiskConverter for VBoxManageConverter {
    async fn convert(&self, request: &ConversionRequest) -> ConvertResult<()> {
        tracing::info!(
            source = %request.source.display(),
            destination = %request.destination.display(),
            format = request.format.vboxmanage_format(),
            "Converting disk with VBoxManage"
        );

        self.run(&Self::clonehd_args(request)).await.map_err(|e| match e {
            ConvertError::ConversionFailed(msg) => ConvertError::ConversionFailed(format!(
                "failed to convert {} to {}: {}",
                request.source.display(),
                request.destination.display(),
                msg
            )),
            other => other,
        })?;

        Ok(())
    }

    fn name(&self) -> &str {
        "vboxmanage"
    }
}
