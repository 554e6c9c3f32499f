//! Image generation port.
//!
//! The remote generator is an opaque, possibly slow, possibly failing
//! collaborator. Callers issue one request per attempt; implementations do
//! not retry.

use async_trait::async_trait;

use crate::domain::Credential;
use crate::error::Result;

/// One outbound generation request.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub credential: &'a Credential,
    pub image: &'a [u8],
    pub mime_type: &'a str,
    pub prompt: &'a str,
}

/// An image part returned by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Declared MIME type of the part, if the generator sent one.
    pub mime_type: Option<String>,
    /// Raw decoded bytes.
    pub data: Vec<u8>,
}

/// Client for an image-to-image generation service.
///
/// # Errors
///
/// Implementations return [`crate::error::CredentialError::Rejected`] when
/// the service refuses the key, and a transform or transport error for
/// anything else.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Generate a new image from a source image and a prompt.
    ///
    /// Returns `Ok(None)` when the call succeeded but the response carried
    /// no image part.
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<Option<GeneratedImage>>;

    /// Issue a minimal request to check that the credential is accepted.
    async fn test_connection(&self, credential: &Credential) -> Result<()>;
}
