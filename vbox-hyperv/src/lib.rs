//! Convert VirtualBox build output into a Hyper-V staging layout.
//!
//! The input is an [`Artifact`] produced by the VirtualBox builder. A run
//! creates a staging directory, converts the VMDK disk to VHD with an
//! external tool, writes a machine descriptor referencing the new disk,
//! wraps the directory as a Hyper-V artifact, and hands it to a
//! [`PackagingStage`].
//!
//! ```ignore
//! use vbox_hyperv::{ConvertOptions, PassthroughPackaging, PostProcessor};
//!
//! let config = ConvertOptions::new("demo").resolve(chrono::Utc::now())?;
//! config.preflight()?;
//! let processor = PostProcessor::from_config(config, Arc::new(PassthroughPackaging))?;
//! let packaged = processor.post_process(input).await?;
//! ```

pub mod artifact;
pub mod config;
pub mod constants;
pub mod convert;
pub mod descriptor;
pub mod disk;
pub mod errors;
pub mod layout;
pub mod packaging;
pub mod pipeline;
pub mod util;

pub use artifact::Artifact;
pub use config::{ConvertOptions, ResolvedConfig};
pub use convert::{ConversionReport, PipelineState, PostProcessor};
pub use descriptor::{render_descriptor, render_vm_xml};
pub use disk::{
    ConversionRequest, ConverterKind, DiskConverter, DiskFormat, QemuImgConverter,
    VBoxManageConverter, converter_for, find_source_disk,
};
pub use errors::{ConvertError, ConvertResult};
pub use layout::{PreparedStaging, StagingLayout, prepare_staging};
pub use packaging::{PackagedArtifact, PackagingStage, PassthroughPackaging};
pub use util::init_logging;
