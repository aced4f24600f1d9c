use crate::{
    error::Result,
    models::{GenerationRequest, ImageReference},
};
use async_trait::async_trait;

/// The remote diagram generator. Implementations perform exactly one call per
/// `generate` and never retry.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Returns the image reference on success. A structured refusal from the
    /// service must come back as `FlowgenError::Rejected`; every other error
    /// is treated as a transport fault by the caller.
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageReference>;
}
