use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::constants::{binaries, envs};
use crate::errors::{ConvertError, ConvertResult};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// File name used for rolling logs.
const LOG_FILE: &str = "vbox-hyperv.log";

/// Initialize tracing.
///
/// Without `log_dir`, logs go to stderr. With it, logs are written to
/// {log_dir}/vbox-hyperv.log with daily rotation. `RUST_LOG` overrides the
/// default `info` filter.
///
/// The returned guard must be kept alive to flush the background writer.
pub fn init_logging(log_dir: Option<&Path>) -> ConvertResult<WorkerGuard> {
    let (non_blocking, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                ConvertError::Io(format!(
                    "Failed to create log directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE);
            tracing_appender::non_blocking(file_appender)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    register_to_tracing(non_blocking, env_filter, log_dir.is_none());

    Ok(guard)
}

fn register_to_tracing(non_blocking: NonBlocking, env_filter: EnvFilter, ansi: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(ansi),
        )
        .try_init();
}

/// Find `binary_name` in any `PATH` entry.
pub fn find_binary(binary_name: &str) -> ConvertResult<PathBuf> {
    find_binary_in(binary_name, path_entries(envs::PATH))
}

/// Find the VBoxManage executable.
///
/// Looks in `VBOX_INSTALL_PATH` entries, then `VBOX_MSI_INSTALL_PATH`, then
/// every `PATH` entry.
pub fn find_vboxmanage() -> ConvertResult<PathBuf> {
    let dirs = path_entries(envs::VBOX_INSTALL_PATH)
        .into_iter()
        .chain(path_entries(envs::VBOX_MSI_INSTALL_PATH))
        .chain(path_entries(envs::PATH));
    find_binary_in(binaries::VBOXMANAGE, dirs)
}

/// Find `binary_name` in the given directories, first hit wins.
///
/// # Returns
/// * `Ok(PathBuf)` - Path to the found binary
/// * `Err(NotFound)` - Binary not found; the message lists every searched location
pub fn find_binary_in(
    binary_name: &str,
    dirs: impl IntoIterator<Item = PathBuf>,
) -> ConvertResult<PathBuf> {
    let candidates: Vec<PathBuf> = dirs
        .into_iter()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(binary_name))
        .collect();

    for candidate in &candidates {
        tracing::trace!(binary = binary_name, path = %candidate.display(), "Checking candidate");
        if candidate.is_file() {
            tracing::debug!(binary = %candidate.display(), "Found binary");
            return Ok(candidate.clone());
        }
    }

    let locations = candidates
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConvertError::NotFound(format!(
        "Binary '{}' not found.\nSearched locations:\n{}",
        binary_name, locations
    )))
}

fn path_entries(var: &str) -> Vec<PathBuf> {
    std::env::var_os(var)
        .map(|value: OsString| std::env::split_paths(&value).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_directory_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(first.path().join("tool"), b"").unwrap();
        std::fs::write(second.path().join("tool"), b"").unwrap();

        let found = find_binary_in(
            "tool",
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
        )
        .unwrap();
        assert_eq!(found, first.path().join("tool"));
    }

    #[test]
    fn test_directories_are_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("tool")).unwrap();

        let err = find_binary_in("tool", vec![dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, ConvertError::NotFound(_)));
    }

    #[test]
    fn test_error_lists_searched_locations() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();

        let err = find_binary_in(
            "VBoxManage",
            vec![a.path().to_path_buf(), PathBuf::new(), b.path().to_path_buf()],
        )
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains(&a.path().join("VBoxManage").display().to_string()));
        assert!(msg.contains(&b.path().join("VBoxManage").display().to_string()));
        assert_eq!(msg.matches("  - ").count(), 2);
    }

    #[test]
    fn test_init_logging_creates_log_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("logs");

        let guard = init_logging(Some(&dir)).unwrap();
        assert!(dir.is_dir());
        drop(guard);
    }
}
