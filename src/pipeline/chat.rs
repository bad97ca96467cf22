//! Flow III — chat. Retrieval reuses Flow II's `search::retrieve` without
//! its own audit write; the chat turn's write (step 4) subsumes it.

use gw_chain::OpType;
use gw_llm::ContextBlock;

use crate::error::GatewayError;
use crate::pipeline::{search, RequestPipeline};
use crate::types::{ChatRequest, ChatResponse};

const DEFAULT_TOP_K: usize = 5;
const MAX_TOP_K: usize = 20;
const MIN_RETRIEVAL_K: usize = 3;

pub(crate) async fn run(pipeline: &RequestPipeline, request: ChatRequest) -> Result<ChatResponse, GatewayError> {
    let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K);
    if top_k == 0 || top_k > MAX_TOP_K {
        return Err(GatewayError::BadRequest(format!("top_k must be within 1..={MAX_TOP_K}")));
    }

    let retrieval_k = top_k.max(MIN_RETRIEVAL_K);
    let hits = search::retrieve(pipeline, &request.message, retrieval_k, request.principal.as_deref(), retrieval_k).await?;

    let context_blocks: Vec<ContextBlock> = hits
        .iter()
        .enumerate()
        .map(|(index, hit)| ContextBlock {
            index,
            relevance: hit.score,
            tag: hit.tag.clone(),
            text: hit.text.clone(),
        })
        .collect();

    let answer = pipeline.llm.chat(gw_llm::SYSTEM_PROMPT, &request.message, &context_blocks).await?;

    let monad_tx = audit_chat(pipeline, &request.message, &answer, request.principal.as_deref()).await;
    let num_memories = hits.len();

    Ok(ChatResponse {
        response: answer,
        memories_used: hits,
        num_memories,
        monad_tx,
    })
}

/// Write the conversation turn as a knowledge event (`opType=0`). Failure is
/// logged, not propagated — there's nothing the caller can retry into a
/// different outcome at this point.
async fn audit_chat(pipeline: &RequestPipeline, message: &str, answer: &str, principal: Option<&str>) -> Option<String> {
    let message_metadata = gw_metadata::extract(message, None).ok()?;
    let title = truncate_chars(message, 100);
    let summary = truncate_chars(answer, 200);
    let tags = gw_scope::scope_chain_tags(principal, &merge_chat_tag(&message_metadata.tags));
    let fingerprint = gw_metadata::fingerprint(&format!("{message}\n---\n{answer}"));

    match pipeline.chain.write_log(OpType::Insert, &title, &summary, &tags, &fingerprint).await {
        Ok(tx_hash) => Some(tx_hash),
        Err(err) => {
            tracing::warn!(error = %err, "chain log write failed for a chat audit record");
            None
        }
    }
}

fn merge_chat_tag(tags: &str) -> String {
    if tags.is_empty() {
        "chat".to_string()
    } else {
        format!("{tags},chat")
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_chat_tag_appends_to_existing_tags() {
        assert_eq!(merge_chat_tag("ml,ai"), "ml,ai,chat");
    }

    #[test]
    fn merge_chat_tag_handles_empty_tags() {
        assert_eq!(merge_chat_tag(""), "chat");
    }
}
