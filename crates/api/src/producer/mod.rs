//! Artifact producer contract.
//!
//! The image model runs behind an external service; this platform only
//! consumes its terminal outcome. A producer either returns image bytes,
//! declines the prompt (content policy), or fails — the dispatcher maps
//! these onto the generation's terminal states.

pub mod http;
pub mod stub;

use async_trait::async_trait;

pub use http::HttpProducer;
pub use stub::StubProducer;

/// Terminal outcome of one generation attempt.
#[derive(Debug)]
pub enum ProducerOutcome {
    /// The model produced an image.
    Image(Vec<u8>),
    /// The producer declined the prompt.
    Rejected { reason: String },
}

#[derive(Debug, thiserror::Error)]
#[error("producer error: {0}")]
pub struct ProducerError(pub String);

/// External image-generation contract.
#[async_trait]
pub trait ArtifactProducer: Send + Sync {
    /// Run one generation. Errors are infrastructure failures; a content
    /// refusal is a successful call returning [`ProducerOutcome::Rejected`].
    async fn produce(
        &self,
        prompt: &str,
        model: &str,
        size: &str,
    ) -> Result<ProducerOutcome, ProducerError>;
}
