//! Constants for the VirtualBox to Hyper-V conversion.
//!
//! Centralized location for producer tags, layout names and template tokens.

/// Producer tags used to recognize artifact provenance.
pub mod producers {
    /// Builder id of artifacts produced by the VirtualBox builders.
    pub const VIRTUALBOX: &str = "mitchellh.virtualbox";

    /// Builder id stamped on artifacts produced by this pipeline.
    pub const HYPERV: &str = "MSOpenTech.hyperv";
}

/// Staging directory layout expected by Hyper-V.
pub mod layout {
    /// Machine descriptors subdirectory
    pub const MACHINES_DIR: &str = "Virtual Machines";

    /// Disk images subdirectory
    pub const DISKS_DIR: &str = "Virtual Hard Disks";

    /// Machine descriptor file name
    pub const DESCRIPTOR_FILE: &str = "vm.xml";

    /// Mode for created directories (Unix only)
    pub const DIR_MODE: u32 = 0o755;

    /// Mode for written descriptor files (Unix only)
    pub const FILE_MODE: u32 = 0o644;
}

/// Tokens substituted in the machine descriptor template.
pub mod placeholders {
    pub const VM_NAME: &str = "INSERT_VM_NAME_HERE";
    pub const VHD_PATH: &str = "INSERT_VHD_PATH_HERE";
}

/// Downstream packaging handoff.
pub mod packaging {
    /// Provider id passed along with the wrapped artifact.
    pub const PROVIDER: &str = "hyperv";
}

/// Wrapped artifact identity.
pub mod artifact {
    /// Id reported by wrapped artifacts
    pub const VM_ID: &str = "VM";
}

/// Environment variables consulted when locating converter binaries.
pub mod envs {
    pub const VBOX_INSTALL_PATH: &str = "VBOX_INSTALL_PATH";
    pub const VBOX_MSI_INSTALL_PATH: &str = "VBOX_MSI_INSTALL_PATH";
    pub const PATH: &str = "PATH";
}

/// External converter executables.
pub mod binaries {
    #[cfg(windows)]
    pub const VBOXMANAGE: &str = "VBoxManage.exe";
    #[cfg(not(windows))]
    pub const VBOXMANAGE: &str = "VBoxManage";

    #[cfg(windows)]
    pub const QEMU_IMG: &str = "qemu-img.exe";
    #[cfg(not(windows))]
    pub const QEMU_IMG: &str = "qemu-img";
}
