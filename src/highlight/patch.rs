//! Patch orchestration: full rebuild vs. partial splice of the node cache

use super::diff::DiffResult;
use super::node_cache::{render_records, NodeCache, NodeRecord};
use super::tokenizer::tokenize;
use super::validator::Validator;

/// A node cache produced by one patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    /// The complete cache after the patch
    pub node_cache: NodeCache,
    /// Records that replace the diff window (every record on a full rebuild)
    pub modified_subrange: Vec<NodeRecord>,
    pub is_full_rebuild: bool,
}

/// What the orchestrator decided for one edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied(PatchResult),
    /// Neither side of the window contains an invalid character; the rendered
    /// state is kept and nothing needs to be redrawn
    Unchanged,
}

impl PatchOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// True when the cache holds nothing that a partial patch could reuse
fn needs_full_rebuild(cache: &NodeCache, diff: &DiffResult) -> bool {
    diff.start_node_index == diff.end_node_index && cache.len() == diff.start_node_index
}

/// Apply `diff` to `cache`, returning the new cache or [`PatchOutcome::Unchanged`].
///
/// The full-rebuild check runs first, so an empty cache is always populated even
/// when the text is entirely valid.
pub fn patch(cache: &NodeCache, diff: &DiffResult, validator: &Validator) -> PatchOutcome {
    if needs_full_rebuild(cache, diff) {
        let node_cache = NodeCache::build(&tokenize(&diff.current_substring), validator);
        tracing::debug!(records = node_cache.len(), "full rebuild");
        return PatchOutcome::Applied(PatchResult {
            modified_subrange: node_cache.records().to_vec(),
            node_cache,
            is_full_rebuild: true,
        });
    }

    if !validator.contains_invalid(&diff.current_substring)
        && !validator.contains_invalid(&diff.previous_substring)
    {
        tracing::debug!(
            start = diff.start_node_index,
            end = diff.end_node_index,
            "no validity change in window, skipping patch"
        );
        return PatchOutcome::Unchanged;
    }

    let seed = cache.offset_of(diff.start_node_index);
    let modified_subrange =
        render_records(&tokenize(&diff.current_substring), validator, seed);
    let node_cache = cache.splice(
        diff.start_node_index,
        diff.end_node_index,
        modified_subrange.clone(),
    );

    tracing::debug!(
        start = diff.start_node_index,
        end = diff.end_node_index,
        replaced_with = modified_subrange.len(),
        records = node_cache.len(),
        "partial patch"
    );
    PatchOutcome::Applied(PatchResult {
        node_cache,
        modified_subrange,
        is_full_rebuild: false,
    })
}
