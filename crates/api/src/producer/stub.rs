//! Deterministic producer for development and tests.

use async_trait::async_trait;

use super::{ArtifactProducer, ProducerError, ProducerOutcome};

/// Smallest valid PNG (1x1, transparent).
const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Produces a placeholder image for any prompt. Prompts containing
/// `[reject]` are declined and prompts containing `[fail]` error, so the
/// dispatcher's failure paths can be driven end to end.
pub struct StubProducer;

#[async_trait]
impl ArtifactProducer for StubProducer {
    async fn produce(
        &self,
        prompt: &str,
        _model: &str,
        _size: &str,
    ) -> Result<ProducerOutcome, ProducerError> {
        if prompt.contains("[fail]") {
            return Err(ProducerError("stub producer forced failure".into()));
        }
        if prompt.contains("[reject]") {
            return Ok(ProducerOutcome::Rejected {
                reason: "stub producer declined the prompt".into(),
            });
        }
        Ok(ProducerOutcome::Image(PLACEHOLDER_PNG.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn produces_png_bytes() {
        let outcome = StubProducer.produce("a fox", "flux-schnell", "512x512").await.unwrap();
        match outcome {
            ProducerOutcome::Image(bytes) => assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']),
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reject_marker_declines() {
        let outcome = StubProducer
            .produce("[reject] nope", "flux-schnell", "512x512")
            .await
            .unwrap();
        assert!(matches!(outcome, ProducerOutcome::Rejected { .. }));
    }

    #[tokio::test]
    async fn fail_marker_errors() {
        assert!(StubProducer
            .produce("[fail] boom", "flux-schnell", "512x512")
            .await
            .is_err());
    }
}
