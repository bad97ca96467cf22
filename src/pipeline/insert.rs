//! Flow I — insert. Vector write precedes chain write; a chain failure is
//! tolerated since the vector write already durably happened.

use gw_chain::OpType;

use crate::error::GatewayError;
use crate::pipeline::RequestPipeline;
use crate::types::{InsertRequest, InsertResponse};

const MAX_CONTENT_BYTES: usize = 100 * 1024;

pub(crate) async fn run(pipeline: &RequestPipeline, request: InsertRequest) -> Result<InsertResponse, GatewayError> {
    if request.content.len() > MAX_CONTENT_BYTES {
        return Err(GatewayError::PayloadTooLarge(format!(
            "content exceeds {MAX_CONTENT_BYTES} bytes"
        )));
    }
    if let Some(principal) = request.principal.as_deref() {
        if !gw_scope::validate_principal(principal) {
            return Err(GatewayError::BadRequest(
                "principal must be non-empty and free of '|', ',', and whitespace".into(),
            ));
        }
    }

    let metadata = gw_metadata::extract(&request.content, request.user_tags.as_deref())?;

    let vector_tag = gw_scope::scope_vector_tag(request.principal.as_deref(), &metadata.tags);
    let vector_outcome = pipeline.vector.insert(&vector_tag, &request.content).await?;

    let chain_tags = gw_scope::scope_chain_tags(request.principal.as_deref(), &metadata.tags);
    let monad_tx = match pipeline
        .chain
        .write_log(OpType::Insert, &metadata.title, &metadata.summary, &chain_tags, &metadata.fingerprint)
        .await
    {
        Ok(tx_hash) => Some(tx_hash),
        Err(err) => {
            tracing::warn!(
                error = %err,
                "chain log write failed after a successful vector insert; reporting success with monad_tx=null"
            );
            None
        }
    };

    Ok(InsertResponse {
        kinic_result: vector_outcome,
        monad_tx,
        metadata,
    })
}
