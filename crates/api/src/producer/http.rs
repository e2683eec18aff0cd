//! HTTP implementation of the producer contract.
//!
//! Speaks a minimal JSON-in / bytes-out protocol:
//! `POST {base_url}/v1/images` with `{ prompt, model, size }` returns
//! `200` with the raw image bytes, or `422` with `{ "reason": ... }` when
//! the prompt is declined. Anything else is an infrastructure failure.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ArtifactProducer, ProducerError, ProducerOutcome};

pub struct HttpProducer {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct RejectionBody {
    reason: String,
}

impl HttpProducer {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl ArtifactProducer for HttpProducer {
    async fn produce(
        &self,
        prompt: &str,
        model: &str,
        size: &str,
    ) -> Result<ProducerOutcome, ProducerError> {
        let url = format!("{}/v1/images", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "prompt": prompt,
                "model": model,
                "size": size,
            }))
            .send()
            .await
            .map_err(|e| ProducerError(format!("request to {url} failed: {e}")))?;

        match response.status().as_u16() {
            200 => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| ProducerError(format!("reading image body failed: {e}")))?;
                Ok(ProducerOutcome::Image(bytes.to_vec()))
            }
            422 => {
                let body: RejectionBody = response
                    .json()
                    .await
                    .map_err(|e| ProducerError(format!("malformed rejection body: {e}")))?;
                Ok(ProducerOutcome::Rejected {
                    reason: body.reason,
                })
            }
            status => Err(ProducerError(format!(
                "producer returned unexpected status {status}"
            ))),
        }
    }
}
