//! Disk image formats.

use std::path::Path;

/// Disk image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskFormat {
    /// VMware/VirtualBox virtual machine disk.
    Vmdk,
    /// Microsoft Virtual Hard Disk.
    Vhd,
}

impl DiskFormat {
    /// Format produced by the VirtualBox builders.
    pub const SOURCE: DiskFormat = DiskFormat::Vmdk;

    /// Format consumed by Hyper-V.
    pub const TARGET: DiskFormat = DiskFormat::Vhd;

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            DiskFormat::Vmdk => "vmdk",
            DiskFormat::Vhd => "vhd",
        }
    }

    /// Value for `VBoxManage clonehd --format`.
    pub fn vboxmanage_format(&self) -> &'static str {
        match self {
            DiskFormat::Vmdk => "VMDK",
            DiskFormat::Vhd => "VHD",
        }
    }

    /// Value for `qemu-img -f`/`-O`.
    pub fn qemu_img_format(&self) -> &'static str {
        match self {
            DiskFormat::Vmdk => "vmdk",
            DiskFormat::Vhd => "vpc",
        }
    }

    /// Whether `path` carries this format's extension (case-insensitive).
    ///
    /// The extension is whatever follows the last dot of the file name, so a
    /// bare `.vmdk` counts.
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once('.'))
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(self.extension()))
    }

    /// File name for a disk called `name` in this format.
    pub fn file_name(&self, name: &str) -> String {
        format!("{}.{}", name, self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_is_case_insensitive() {
        assert!(DiskFormat::Vmdk.matches(Path::new("/x/disk.vmdk")));
        assert!(DiskFormat::Vmdk.matches(Path::new("/x/DISK.VMDK")));
        assert!(DiskFormat::Vmdk.matches(Path::new("disk.VmDk")));
        assert!(!DiskFormat::Vmdk.matches(Path::new("/x/disk.vhd")));
        assert!(!DiskFormat::Vmdk.matches(Path::new("/x/vmdk")));
        assert!(!DiskFormat::Vmdk.matches(Path::new("/x/disk.vmdk.bak")));
    }

    #[test]
    fn test_matches_hidden_file_name() {
        assert!(DiskFormat::Vmdk.matches(Path::new("/x/.vmdk")));
        assert!(DiskFormat::Vmdk.matches(Path::new(".VMDK")));
        assert!(!DiskFormat::Vmdk.matches(Path::new("/x/.vmdk.d/readme")));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(DiskFormat::Vhd.file_name("packer-demo-1"), "packer-demo-1.vhd");
    }

    #[test]
    fn test_tool_format_names() {
        assert_eq!(DiskFormat::TARGET.vboxmanage_format(), "VHD");
        assert_eq!(DiskFormat::TARGET.qemu_img_format(), "vpc");
        assert_eq!(DiskFormat::SOURCE.qemu_img_format(), "vmdk");
    }
}
