/// One retrieved memory rendered into the chat prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextBlock {
    pub index: usize,
    pub relevance: f32,
    pub tag: String,
    pub text: String,
}
