use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::VectorConfig;
use crate::error::VectorError;
use crate::resilience::CircuitBreaker;
use crate::types::{InsertOutcome, SearchHit};

const MAX_TEXT_BYTES: usize = 100 * 1024;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(16)
        .build()
        .expect("failed to build vector-store http client")
});

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct CanisterInsertRequest<'a> {
    embedding: &'a [f32],
    tagged_text: &'a str,
}

#[derive(Deserialize)]
struct CanisterInsertResponse {
    stored: bool,
    id: Option<String>,
}

#[derive(Serialize)]
struct CanisterSearchRequest<'a> {
    query_embedding: &'a [f32],
    limit: usize,
}

#[derive(Deserialize)]
struct CanisterSearchResponse {
    results: Vec<CanisterSearchHit>,
}

#[derive(Deserialize)]
struct CanisterSearchHit {
    score: f32,
    tagged_text: String,
}

/// Remote client for the semantic vector-search canister.
///
/// One long-lived identity, carried on every call; no retries here — the
/// caller (the request pipeline) owns retry policy. The circuit breaker
/// below protects the transport independently of that retry policy.
pub struct VectorStoreClient {
    config: VectorConfig,
    breaker: CircuitBreaker,
}

impl VectorStoreClient {
    pub fn new(config: VectorConfig) -> Self {
        let breaker = CircuitBreaker::new(config.circuit_breaker);
        Self { config, breaker }
    }

    /// Store `text` under `tag`. `tag` is the full `ScopedTag` — this client
    /// is agnostic to whatever namespacing the caller folded into it.
    pub async fn insert(&self, tag: &str, text: &str) -> Result<InsertOutcome, VectorError> {
        if tag.is_empty() {
            return Err(VectorError::InvalidInput("tag must not be empty".into()));
        }
        if text.len() > MAX_TEXT_BYTES {
            return Err(VectorError::InvalidInput(format!(
                "text exceeds {MAX_TEXT_BYTES} bytes"
            )));
        }
        if !self.breaker.allow_request() {
            return Err(VectorError::CircuitOpen);
        }

        let result = self.do_insert(tag, text).await;
        match &result {
            Ok(_) => self.breaker.record_success(),
            Err(VectorError::RemoteUnavailable(_)) => self.breaker.record_failure(),
            Err(_) => {}
        }
        result
    }

    async fn do_insert(&self, tag: &str, text: &str) -> Result<InsertOutcome, VectorError> {
        let embedding = self.fetch_embedding(text).await?;
        let tagged_text = format!("{tag}: {text}");

        let url = format!("{}/insert", self.config.canister_base_url);
        let response = HTTP_CLIENT
            .post(&url)
            .timeout(self.config.timeout)
            .header("X-Identity-Key", &self.config.identity_key)
            .json(&CanisterInsertRequest {
                embedding: &embedding,
                tagged_text: &tagged_text,
            })
            .send()
            .await
            .map_err(|e| VectorError::RemoteUnavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(VectorError::Authority("identity rejected by canister".into()));
        }
        if !response.status().is_success() {
            return Err(VectorError::RemoteRejected(format!(
                "canister returned {}",
                response.status()
            )));
        }

        let parsed: CanisterInsertResponse = response
            .json()
            .await
            .map_err(|e| VectorError::RemoteRejected(e.to_string()))?;

        Ok(InsertOutcome {
            stored: parsed.stored,
            id: parsed.id,
        })
    }

    /// Fetch at least `k` hits (over-fetching when a principal scope will
    /// post-filter the results) and return them ranked by score.
    pub async fn search(
        &self,
        query: &str,
        k: usize,
        principal_hint: Option<&str>,
    ) -> Result<Vec<SearchHit>, VectorError> {
        if query.trim().is_empty() {
            return Err(VectorError::InvalidInput("query must not be empty".into()));
        }
        if !(1..=50).contains(&k) {
            return Err(VectorError::InvalidInput("k must be within 1..=50".into()));
        }
        if !self.breaker.allow_request() {
            return Err(VectorError::CircuitOpen);
        }

        let ceiling = if principal_hint.is_some() {
            (k * self.config.search_ceiling_multiplier.max(3)).max(k)
        } else {
            k
        };

        let result = self.do_search(query, ceiling).await;
        match &result {
            Ok(_) => self.breaker.record_success(),
            Err(VectorError::RemoteUnavailable(_)) => self.breaker.record_failure(),
            Err(_) => {}
        }
        result
    }

    async fn do_search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, VectorError> {
        let embedding = self.fetch_embedding(query).await?;

        let url = format!("{}/search", self.config.canister_base_url);
        let response = HTTP_CLIENT
            .post(&url)
            .timeout(self.config.timeout)
            .header("X-Identity-Key", &self.config.identity_key)
            .json(&CanisterSearchRequest {
                query_embedding: &embedding,
                limit,
            })
            .send()
            .await
            .map_err(|e| VectorError::RemoteUnavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(VectorError::Authority("identity rejected by canister".into()));
        }
        if !response.status().is_success() {
            return Err(VectorError::RemoteRejected(format!(
                "canister returned {}",
                response.status()
            )));
        }

        let parsed: CanisterSearchResponse = response
            .json()
            .await
            .map_err(|e| VectorError::RemoteRejected(e.to_string()))?;

        Ok(parsed
            .results
            .into_iter()
            .map(|hit| split_tagged_text(hit.score, &hit.tagged_text))
            .collect())
    }

    async fn fetch_embedding(&self, text: &str) -> Result<Vec<f32>, VectorError> {
        let response = HTTP_CLIENT
            .post(&self.config.embedding_service_url)
            .timeout(self.config.timeout)
            .json(&EmbedRequest { text })
            .send()
            .await
            .map_err(|e| VectorError::RemoteUnavailable(format!("embedding service: {e}")))?;

        if !response.status().is_success() {
            return Err(VectorError::RemoteRejected(format!(
                "embedding service returned {}",
                response.status()
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| VectorError::RemoteRejected(format!("embedding service: {e}")))?;

        Ok(parsed.embedding)
    }

    #[cfg(test)]
    pub(crate) fn breaker_state(&self) -> crate::resilience::CircuitState {
        self.breaker.current_state()
    }
}

/// Split a canister `tagged_text` (`"{tag}: {content}"`) back into its tag
/// and text halves on the first `": "`.
fn split_tagged_text(score: f32, tagged_text: &str) -> SearchHit {
    match tagged_text.split_once(": ") {
        Some((tag, text)) => SearchHit {
            text: text.to_string(),
            score,
            tag: tag.to_string(),
        },
        None => SearchHit {
            text: tagged_text.to_string(),
            score,
            tag: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_tagged_text_on_first_colon_space() {
        let hit = split_tagged_text(0.9, "alice|ml,ai: actual content: with colon");
        assert_eq!(hit.tag, "alice|ml,ai");
        assert_eq!(hit.text, "actual content: with colon");
        assert_eq!(hit.score, 0.9);
    }

    #[test]
    fn falls_back_when_no_separator_present() {
        let hit = split_tagged_text(0.1, "untagged content");
        assert_eq!(hit.tag, "");
        assert_eq!(hit.text, "untagged content");
    }

    #[tokio::test]
    async fn rejects_empty_tag() {
        let client = VectorStoreClient::new(VectorConfig::default());
        let err = client.insert("", "hello").await.unwrap_err();
        assert!(matches!(err, VectorError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn rejects_oversized_text() {
        let client = VectorStoreClient::new(VectorConfig::default());
        let huge = "a".repeat(MAX_TEXT_BYTES + 1);
        let err = client.insert("tag", &huge).await.unwrap_err();
        assert!(matches!(err, VectorError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn rejects_k_out_of_bounds() {
        let client = VectorStoreClient::new(VectorConfig::default());
        let err = client.search("hi", 0, None).await.unwrap_err();
        assert!(matches!(err, VectorError::InvalidInput(_)));
        let err = client.search("hi", 51, None).await.unwrap_err();
        assert!(matches!(err, VectorError::InvalidInput(_)));
    }
}
