//! Two-pointer token diff.
//!
//! Finds the smallest window of token indices in which the previous and current
//! texts disagree, widened by one neighbouring token on each side so that edits
//! which merge or split tokens (deleting or typing a space) are still captured
//! inside the window.
//!
//! The boundary corrections at document head and end are deliberately asymmetric;
//! the patch step relies on these exact indices when splicing the node cache.

use super::tokenizer::tokenize;

/// Window of the node cache that must be regenerated after an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// First node index to replace
    pub start_node_index: usize,
    /// Last node index to replace (inclusive, index into the previous tokens)
    pub end_node_index: usize,
    /// The edit touched the very first token
    pub starts_at_document_head: bool,
    /// Current-side text covering the window
    pub current_substring: String,
    /// Previous-side text covering the window
    pub previous_substring: String,
}

impl DiffResult {
    /// Number of previous nodes covered by the window
    pub fn window_len(&self) -> usize {
        self.end_node_index + 1 - self.start_node_index.min(self.end_node_index + 1)
    }
}

fn token_at<'a>(tokens: &[&'a str], index: isize) -> Option<&'a str> {
    usize::try_from(index).ok().and_then(|i| tokens.get(i).copied())
}

/// Concatenate `tokens[start..=right]`, skipping missing and empty tokens
fn join_window(tokens: &[&str], start: usize, right: isize) -> String {
    let Ok(right) = usize::try_from(right) else {
        return String::new();
    };
    if start > right {
        return String::new();
    }
    tokens
        .iter()
        .skip(start)
        .take(right - start + 1)
        .copied()
        .collect()
}

/// Compare `previous` and `current` and locate the window to re-render
pub fn diff(previous: &str, current: &str) -> DiffResult {
    let prev_tokens = tokenize(previous);
    let curr_tokens = tokenize(current);

    // Left scan: first index where the sequences disagree
    let mut left = 0;
    while let (Some(curr), Some(prev)) = (curr_tokens.get(left), prev_tokens.get(left)) {
        if curr.is_empty() || curr != prev {
            break;
        }
        left += 1;
    }
    let mut start_node_index = left;

    // Right scan: mirrored pointers move inward while tokens agree, never
    // crossing the left pointer on either side
    let mut right_curr = curr_tokens.len() as isize - 1;
    let mut right_prev = prev_tokens.len() as isize - 1;
    while left as isize <= right_prev && left as isize <= right_curr {
        if token_at(&curr_tokens, right_curr) != token_at(&prev_tokens, right_prev) {
            break;
        }
        right_curr -= 1;
        right_prev -= 1;
    }

    let last_prev = prev_tokens.len() as isize - 1;
    let end_node_index = if right_prev < 0 {
        // Every previous token matched from the right: text was typed in front
        right_curr += 1;
        right_prev += 1;
        0
    } else if right_prev == last_prev {
        // Edit reaches the document end
        right_prev
    } else {
        // One token of right-side context
        right_curr += 1;
        right_prev += 1;
        right_prev
    };

    let mut starts_at_document_head = false;
    if start_node_index == prev_tokens.len() {
        // Appended past the end: point at the last real node
        start_node_index -= 1;
    } else if start_node_index == 0 {
        starts_at_document_head = true;
    } else {
        // One token of left-side context
        start_node_index -= 1;
    }

    let result = DiffResult {
        start_node_index,
        end_node_index: end_node_index as usize,
        starts_at_document_head,
        current_substring: join_window(&curr_tokens, start_node_index, right_curr),
        previous_substring: join_window(&prev_tokens, start_node_index, right_prev),
    };

    tracing::debug!(
        start = result.start_node_index,
        end = result.end_node_index,
        at_head = result.starts_at_document_head,
        prev_tokens = prev_tokens.len(),
        curr_tokens = curr_tokens.len(),
        "diff window"
    );
    result
}
