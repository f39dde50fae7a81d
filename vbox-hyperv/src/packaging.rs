//! Downstream packaging capability.
//!
//! The conversion pipeline hands its wrapped artifact to a `PackagingStage`
//! and returns whatever that stage reports, unchanged.

use crate::artifact::Artifact;
use crate::errors::ConvertResult;
use async_trait::async_trait;

/// Result of a packaging stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedArtifact {
    /// Artifact after packaging (possibly transformed).
    pub artifact: Artifact,
    /// Whether the packaging stage's input should be kept.
    pub keep_input: bool,
}

/// Follow-on stage that consumes the staged Hyper-V artifact.
#[async_trait]
pub trait PackagingStage: Send + Sync {
    /// Package `artifact` for `provider`.
    async fn package(&self, provider: &str, artifact: Artifact) -> ConvertResult<PackagedArtifact>;
}

/// Packaging stage that returns the staged artifact as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughPackaging;

#[async_trait]
impl PackagingStage for PassthroughPackaging {
    async fn package(&self, provider: &str, artifact: Artifact) -> ConvertResult<PackagedArtifact> {
        tracing::debug!(provider, artifact = %artifact, "Passing artifact through unpackaged");
        Ok(PackagedArtifact {
            artifact,
            keep_input: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_passthrough_returns_artifact_unchanged() {
        let artifact = Artifact::new("MSOpenTech.hyperv", vec![PathBuf::from("a/vm.xml")])
            .with_directory("a");
        let packaged = PassthroughPackaging
            .package("hyperv", artifact.clone())
            .await
            .unwrap();
        assert_eq!(packaged.artifact, artifact);
        assert!(packaged.keep_input);
    }
}
