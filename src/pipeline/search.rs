//! Flow II — search. Also backs Flow III's own retrieval step via
//! [`retrieve`], which performs no audit write of its own: the chat turn's
//! write subsumes it.

use gw_chain::OpType;
use gw_vector::{SearchHit, VectorError};

use crate::error::GatewayError;
use crate::pipeline::RequestPipeline;
use crate::types::{SearchRequest, SearchResponse};

const DEFAULT_TOP_K: usize = 10;
const MAX_TOP_K: usize = 50;

pub(crate) async fn run(pipeline: &RequestPipeline, request: SearchRequest) -> Result<SearchResponse, GatewayError> {
    let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K);
    let filtered = retrieve(pipeline, &request.query, top_k, request.principal.as_deref(), MAX_TOP_K).await?;
    let monad_tx = audit_search(pipeline, &request.query, top_k, filtered.len(), request.principal.as_deref()).await;
    let num_results = filtered.len();

    Ok(SearchResponse {
        results: filtered,
        monad_tx,
        num_results,
    })
}

/// Validate, retry once on a transient vector-store failure, and post-filter
/// by principal ownership. Shared by `/search` and `/chat`. Over-fetching to
/// absorb the post-filter is the vector client's own job — `top_k` is the
/// caller-facing bound the client's `1..=50` validation expects, so it's
/// passed through unscaled.
pub(crate) async fn retrieve(
    pipeline: &RequestPipeline,
    query: &str,
    top_k: usize,
    principal: Option<&str>,
    max_top_k: usize,
) -> Result<Vec<SearchHit>, GatewayError> {
    if query.trim().is_empty() {
        return Err(GatewayError::BadRequest("query must not be empty".into()));
    }
    if top_k == 0 || top_k > max_top_k {
        return Err(GatewayError::BadRequest(format!("top_k must be within 1..={max_top_k}")));
    }
    if let Some(principal) = principal {
        if !gw_scope::validate_principal(principal) {
            return Err(GatewayError::BadRequest(
                "principal must be non-empty and free of '|', ',', and whitespace".into(),
            ));
        }
    }

    let hits = match pipeline.vector.search(query, top_k, principal).await {
        Ok(hits) => hits,
        Err(VectorError::RemoteUnavailable(_)) => pipeline.vector.search(query, top_k, principal).await?,
        Err(err) => return Err(err.into()),
    };

    let mut filtered: Vec<SearchHit> = hits
        .into_iter()
        .filter(|hit| gw_scope::is_owned_by(&hit.tag, principal))
        .collect();
    filtered.truncate(top_k);
    Ok(filtered)
}

/// Write the compact audit record for a search. Failure here is logged, not
/// propagated — the HTTP result never changes because of it.
async fn audit_search(
    pipeline: &RequestPipeline,
    query: &str,
    top_k: usize,
    returned: usize,
    principal: Option<&str>,
) -> Option<String> {
    let query_metadata = gw_metadata::extract(query, None).ok()?;
    let title = format!("SEARCH: {}", truncate_chars(query, 90));
    let summary = format!("k={top_k}; returned={returned}");
    let tags = gw_scope::scope_chain_tags(principal, &format!("search,{}", query_metadata.tags));

    match pipeline
        .chain
        .write_log(OpType::Search, &title, &summary, &tags, &query_metadata.fingerprint)
        .await
    {
        Ok(tx_hash) => Some(tx_hash),
        Err(err) => {
            tracing::warn!(error = %err, "chain log write failed for a search audit record");
            None
        }
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_chars_counts_codepoints_not_bytes() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
        assert_eq!(truncate_chars("hi", 90), "hi");
    }
}
