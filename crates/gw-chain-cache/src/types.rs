/// Point-in-time summary of the projection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub total: usize,
    /// Records written by Flow I (`opType == 0`).
    pub inserts: usize,
    /// Records written by Flow III, whose audit write subsumes a search (`opType == 1`).
    pub searches: usize,
    pub unique_tags: usize,
    pub unique_users: usize,
}

/// One entry of [`crate::ChainLogCache::trending_tags`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}
