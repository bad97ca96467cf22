//! Prompt assembly: renders context blocks into a stable template and
//! truncates to a token budget by dropping the least relevant blocks first.

use crate::types::ContextBlock;

pub const SYSTEM_PROMPT: &str =
    "You are a memory-aware assistant. Cite from the provided memories when they are relevant, \
     and say plainly when the provided context is insufficient to answer.";

fn approx_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

fn render_block(block: &ContextBlock) -> String {
    format!(
        "[Memory {}] (relevance: {:.2}, tags: {})\n{}\n",
        block.index, block.relevance, block.tag, block.text
    )
}

/// Render `system` + `user_message` + as many `blocks` as fit within
/// `token_budget`, preferring to keep the most relevant ones.
///
/// Blocks are dropped lowest-relevance-first until the whole prompt fits;
/// the blocks that survive are rendered in their original index order.
pub fn build_prompt(
    system: &str,
    user_message: &str,
    blocks: &[ContextBlock],
    token_budget: usize,
) -> (String, String) {
    let fixed_cost = approx_tokens(system) + approx_tokens(user_message);

    let mut ranked: Vec<&ContextBlock> = blocks.iter().collect();
    ranked.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));

    let mut kept: Vec<&ContextBlock> = Vec::new();
    let mut used = fixed_cost;
    for block in ranked {
        let cost = approx_tokens(&render_block(block));
        if used + cost > token_budget && !kept.is_empty() {
            continue;
        }
        used += cost;
        kept.push(block);
    }

    kept.sort_by_key(|b| b.index);
    let context_section = kept.iter().map(|b| render_block(b)).collect::<Vec<_>>().join("");

    let user_content = if context_section.is_empty() {
        user_message.to_string()
    } else {
        format!("{context_section}\n{user_message}")
    };

    (system.to_string(), user_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(index: usize, relevance: f32, text: &str) -> ContextBlock {
        ContextBlock {
            index,
            relevance,
            tag: "t".into(),
            text: text.into(),
        }
    }

    #[test]
    fn renders_all_blocks_when_budget_is_generous() {
        let blocks = vec![block(0, 0.9, "alpha"), block(1, 0.5, "beta")];
        let (_, user) = build_prompt("sys", "question", &blocks, 10_000);
        assert!(user.contains("alpha"));
        assert!(user.contains("beta"));
        assert!(user.contains("question"));
    }

    #[test]
    fn drops_lowest_relevance_blocks_first_under_tight_budget() {
        let blocks = vec![
            block(0, 0.9, "high relevance content here"),
            block(1, 0.1, "low relevance content here too"),
        ];
        let (_, user) = build_prompt("sys", "question", &blocks, 12);
        assert!(user.contains("high relevance"));
        assert!(!user.contains("low relevance"));
    }

    #[test]
    fn preserves_original_order_among_kept_blocks() {
        let blocks = vec![block(0, 0.2, "first"), block(1, 0.9, "second")];
        let (_, user) = build_prompt("sys", "q", &blocks, 10_000);
        assert!(user.find("first").unwrap() < user.find("second").unwrap());
    }
}
