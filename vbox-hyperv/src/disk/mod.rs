//! Disk image operations.
//!
//! This module provides the disk side of the conversion:
//! - `DiskFormat` - Disk format types (Vmdk, Vhd)
//! - `find_source_disk` - Locate the source disk inside an artifact
//! - `DiskConverter` - Capability for external format conversion
//! - `VBoxManageConverter` / `QemuImgConverter` - Drivers for the external tools

mod converter;
mod format;
mod locator;
mod qemu_img;
mod vboxmanage;

pub use converter::{ConversionRequest, ConverterKind, DiskConverter, converter_for};
pub use format::DiskFormat;
pub use locator::find_source_disk;
pub(crate) use locator::missing_disk;
pub use qemu_img::QemuImgConverter;
pub use vboxmanage::VBoxManageConverter;
