//! Staging directory layout expected by Hyper-V.
//!
//! ```text
//! {staging_root}/
//! ├── Virtual Machines/
//! │   └── vm.xml              # Machine descriptor
//! └── Virtual Hard Disks/
//!     └── {disk_name}.vhd     # Converted disk
//! ```

use crate::constants::layout::{DESCRIPTOR_FILE, DIR_MODE, DISKS_DIR, FILE_MODE, MACHINES_DIR};
use crate::disk::DiskFormat;
use crate::errors::{ConvertError, ConvertResult};
use std::path::{Path, PathBuf};

/// Filesystem layout for one staging directory.
#[derive(Clone, Debug)]
pub struct StagingLayout {
    root: PathBuf,
}

impl StagingLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory: {staging_root}
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Machine descriptors: {staging_root}/Virtual Machines
    pub fn machines_dir(&self) -> PathBuf {
        self.root.join(MACHINES_DIR)
    }

    /// Disk images: {staging_root}/Virtual Hard Disks
    pub fn disks_dir(&self) -> PathBuf {
        self.root.join(DISKS_DIR)
    }

    /// Descriptor path: {staging_root}/Virtual Machines/vm.xml
    pub fn descriptor_path(&self) -> PathBuf {
        self.machines_dir().join(DESCRIPTOR_FILE)
    }

    /// Converted disk path: {staging_root}/Virtual Hard Disks/{disk_name}.vhd
    pub fn disk_path(&self, disk_name: &str) -> PathBuf {
        self.disks_dir().join(DiskFormat::TARGET.file_name(disk_name))
    }

    /// Create the staging tree.
    ///
    /// Fails with `AlreadyExists` before touching the filesystem if the root
    /// is already present. A failure halfway leaves whatever was created.
    pub fn prepare(&self) -> ConvertResult<PreparedStaging> {
        if self.root.exists() {
            return Err(ConvertError::AlreadyExists(format!(
                "staging directory '{}' already exists",
                self.root.display()
            )));
        }

        create_dir(&self.root, true)?;

        let machines_dir = self.machines_dir();
        create_dir(&machines_dir, false)?;

        let disks_dir = self.disks_dir();
        create_dir(&disks_dir, false)?;

        tracing::debug!(staging_root = %self.root.display(), "Prepared staging directory");

        Ok(PreparedStaging {
            machines_dir,
            disks_dir,
        })
    }

    /// Write the machine descriptor to its conventional location.
    pub fn write_descriptor(&self, contents: &[u8]) -> ConvertResult<PathBuf> {
        let path = self.descriptor_path();
        write_file(&path, contents).map_err(|e| {
            ConvertError::Io(format!("failed to write {}: {}", path.display(), e))
        })?;
        Ok(path)
    }

    /// Delete a previously staged tree.
    ///
    /// Refuses roots that do not hold both layout subdirectories, so an
    /// arbitrary directory is never removed.
    pub fn remove(&self) -> ConvertResult<()> {
        if !self.root.exists() {
            return Err(ConvertError::NotFound(format!(
                "staging directory '{}' does not exist",
                self.root.display()
            )));
        }
        for dir in [self.machines_dir(), self.disks_dir()] {
            if !dir.is_dir() {
                return Err(ConvertError::Config(format!(
                    "'{}' is not a staging directory: missing {}",
                    self.root.display(),
                    dir.display()
                )));
            }
        }

        std::fs::remove_dir_all(&self.root).map_err(|e| {
            ConvertError::Io(format!(
                "failed to remove staging directory {}: {}",
                self.root.display(),
                e
            ))
        })?;
        tracing::info!(staging_root = %self.root.display(), "Removed staging directory");
        Ok(())
    }
}

/// Directories created by `StagingLayout::prepare`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedStaging {
    pub machines_dir: PathBuf,
    pub disks_dir: PathBuf,
}

/// Prepare the staging tree rooted at `root`.
pub fn prepare_staging(root: &Path) -> ConvertResult<PreparedStaging> {
    StagingLayout::new(root).prepare()
}

fn create_dir(path: &Path, recursive: bool) -> ConvertResult<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(recursive);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    #[cfg(not(unix))]
    let _ = DIR_MODE;

    builder.create(path).map_err(|e| {
        ConvertError::Io(format!(
            "failed to create output directory {}: {}",
            path.display(),
            e
        ))
    })
}

fn write_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.create(true).write(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    #[cfg(not(unix))]
    let _ = FILE_MODE;

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let layout = StagingLayout::new("output-demo-hyperv");
        assert_eq!(
            layout.machines_dir(),
            PathBuf::from("output-demo-hyperv/Virtual Machines")
        );
        assert_eq!(
            layout.disks_dir(),
            PathBuf::from("output-demo-hyperv/Virtual Hard Disks")
        );
        assert_eq!(
            layout.descriptor_path(),
            PathBuf::from("output-demo-hyperv/Virtual Machines/vm.xml")
        );
        assert_eq!(
            layout.disk_path("packer-demo-1"),
            PathBuf::from("output-demo-hyperv/Virtual Hard Disks/packer-demo-1.vhd")
        );
    }

    #[test]
    fn test_prepare_creates_both_subdirectories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("output-demo-hyperv");

        let prepared = prepare_staging(&root).unwrap();

        assert!(prepared.machines_dir.is_dir());
        assert!(prepared.disks_dir.is_dir());
        assert_eq!(prepared.machines_dir, root.join("Virtual Machines"));
        assert_eq!(prepared.disks_dir, root.join("Virtual Hard Disks"));
    }

    #[test]
    fn test_prepare_twice_fails_with_already_exists() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("output-demo-hyperv");

        prepare_staging(&root).unwrap();
        let err = prepare_staging(&root).unwrap_err();
        assert!(matches!(err, ConvertError::AlreadyExists(_)));
    }

    #[test]
    fn test_prepare_rejects_existing_empty_root() {
        let temp = TempDir::new().unwrap();
        let err = prepare_staging(temp.path()).unwrap_err();
        assert!(matches!(err, ConvertError::AlreadyExists(_)));
        // Nothing was created inside the pre-existing root
        assert!(!temp.path().join("Virtual Machines").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_and_descriptor_modes() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let layout = StagingLayout::new(temp.path().join("staged"));
        let prepared = layout.prepare().unwrap();
        let descriptor = layout.write_descriptor(b"<configuration/>").unwrap();

        // Modes are subject to umask; check no bits beyond the requested ones
        let dir_mode = std::fs::metadata(&prepared.disks_dir).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777 & !DIR_MODE, 0);
        let file_mode = std::fs::metadata(&descriptor).unwrap().permissions().mode();
        assert_eq!(file_mode & 0o777 & !FILE_MODE, 0);
        assert_eq!(std::fs::read(&descriptor).unwrap(), b"<configuration/>");
    }

    #[test]
    fn test_remove_deletes_prepared_tree() {
        let temp = TempDir::new().unwrap();
        let layout = StagingLayout::new(temp.path().join("output-demo-hyperv"));
        layout.prepare().unwrap();
        layout.write_descriptor(b"<configuration/>").unwrap();

        layout.remove().unwrap();
        assert!(!layout.root().exists());
    }

    #[test]
    fn test_remove_refuses_unrelated_directory() {
        let temp = TempDir::new().unwrap();
        let docs = temp.path().join("home-docs");
        std::fs::create_dir_all(docs.join("Virtual Machines")).unwrap();
        std::fs::write(docs.join("thesis.txt"), "draft").unwrap();

        let err = StagingLayout::new(&docs).remove().unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
        assert!(docs.join("thesis.txt").exists());
    }

    #[test]
    fn test_remove_missing_root_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = StagingLayout::new(temp.path().join("typo")).remove().unwrap_err();
        assert!(matches!(err, ConvertError::NotFound(_)));
    }

    #[test]
    fn test_write_descriptor_without_prepare_is_io_error() {
        let temp = TempDir::new().unwrap();
        let layout = StagingLayout::new(temp.path().join("never-prepared"));
        let err = layout.write_descriptor(b"x").unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)));
    }
}
