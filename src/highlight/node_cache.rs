//! Cache of rendered node records, one per token

use super::validator::Validator;
use crate::util::text::char_len;

/// Rendered form of one token plus its character span in the plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub markup: String,
    /// First character offset (inclusive, zero-based)
    pub start_offset: usize,
    /// Last character offset (inclusive)
    pub end_offset: usize,
    /// Number of invalid characters tagged in `markup`
    pub invalid_count: usize,
}

impl NodeRecord {
    /// Number of characters covered by this record
    pub fn char_len(&self) -> usize {
        self.end_offset + 1 - self.start_offset
    }

    fn shifted(&self, delta: isize) -> Self {
        Self {
            markup: self.markup.clone(),
            start_offset: self.start_offset.saturating_add_signed(delta),
            end_offset: self.end_offset.saturating_add_signed(delta),
            invalid_count: self.invalid_count,
        }
    }
}

/// Validate `tokens` in order, assigning offsets from `seed_offset` onward.
/// Empty tokens produce no record.
pub fn render_records(tokens: &[&str], validator: &Validator, seed_offset: usize) -> Vec<NodeRecord> {
    let mut offset = seed_offset;
    tokens
        .iter()
        .filter(|token| !token.is_empty())
        .map(|token| {
            let validated = validator.validate(token);
            let len = char_len(token);
            let record = NodeRecord {
                markup: validated.markup,
                start_offset: offset,
                end_offset: offset + len - 1,
                invalid_count: validated.invalid_count,
            };
            offset += len;
            record
        })
        .collect()
}

/// Ordered node records, one-to-one with the tokens of the rendered text.
///
/// Never mutated in place: [`NodeCache::splice`] returns a new cache, so a caller
/// holding the old one never observes a half-applied patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCache {
    records: Vec<NodeRecord>,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full rebuild from an already tokenized text
    pub fn build(tokens: &[&str], validator: &Validator) -> Self {
        Self {
            records: render_records(tokens, validator, 0),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&NodeRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeRecord> {
        self.records.iter()
    }

    /// Length in characters of the text this cache renders
    pub fn text_len(&self) -> usize {
        self.records.last().map_or(0, |r| r.end_offset + 1)
    }

    /// Offset where record `index` starts, or the text length past the end
    pub fn offset_of(&self, index: usize) -> usize {
        self.records
            .get(index)
            .map_or_else(|| self.text_len(), |r| r.start_offset)
    }

    /// Total invalid characters across all records
    pub fn invalid_count(&self) -> usize {
        self.records.iter().map(|r| r.invalid_count).sum()
    }

    /// Concatenated markup of all records
    pub fn markup(&self) -> String {
        self.records.iter().map(|r| r.markup.as_str()).collect()
    }

    /// Replace records `start..=end` with `replacement`, returning the new cache.
    ///
    /// Prefix records are copied as-is; suffix records are copied with their
    /// offsets shifted so spans stay contiguous after the replacement. Indices past
    /// the end are clamped, so `start == len()` appends.
    pub fn splice(&self, start: usize, end: usize, replacement: Vec<NodeRecord>) -> NodeCache {
        let start = start.min(self.records.len());
        let suffix_start = end.saturating_add(1).clamp(start, self.records.len());

        let old_next = self.offset_of(suffix_start);
        let new_next = replacement
            .last()
            .map_or_else(|| self.offset_of(start), |r| r.end_offset + 1);
        let delta = new_next as isize - old_next as isize;

        let mut records = Vec::with_capacity(start + replacement.len() + (self.records.len() - suffix_start));
        records.extend_from_slice(&self.records[..start]);
        records.extend(replacement);
        records.extend(self.records[suffix_start..].iter().map(|r| r.shifted(delta)));

        NodeCache { records }
    }
}

impl<'a> IntoIterator for &'a NodeCache {
    type Item = &'a NodeRecord;
    type IntoIter = std::slice::Iter<'a, NodeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::tokenizer::tokenize;

    fn build(text: &str) -> NodeCache {
        NodeCache::build(&tokenize(text), &Validator::default())
    }

    fn assert_contiguous(cache: &NodeCache) {
        for pair in cache.records().windows(2) {
            assert_eq!(pair[1].start_offset, pair[0].end_offset + 1);
        }
    }

    #[test]
    fn test_build_assigns_inclusive_offsets() {
        let cache = build("ab cd!");
        let spans: Vec<_> = cache.iter().map(|r| (r.start_offset, r.end_offset)).collect();
        assert_eq!(spans, vec![(0, 1), (2, 2), (3, 5)]);
        assert_eq!(cache.text_len(), 6);
        assert_eq!(cache.invalid_count(), 1);
    }

    #[test]
    fn test_build_empty_text_has_no_records() {
        let cache = build("");
        assert!(cache.is_empty());
        assert_eq!(cache.text_len(), 0);
        assert_eq!(cache.markup(), "");
    }

    #[test]
    fn test_splice_shifts_suffix_offsets() {
        let cache = build("ab cd ef");
        let validator = Validator::default();
        let replacement = render_records(&["c#d", " "], &validator, cache.offset_of(2));
        let spliced = cache.splice(2, 3, replacement);

        assert_eq!(spliced.len(), 5);
        assert_contiguous(&spliced);
        assert_eq!(spliced.text_len(), 9);
        assert_eq!(spliced.get(4).map(|r| r.start_offset), Some(7));
        // The source cache is untouched
        assert_eq!(cache.text_len(), 8);
    }

    #[test]
    fn test_splice_with_empty_replacement_removes_records() {
        let cache = build("a b c");
        let spliced = cache.splice(1, 2, Vec::new());
        assert_eq!(spliced.len(), 3);
        assert_contiguous(&spliced);
        assert_eq!(spliced.text_len(), 3);
    }

    #[test]
    fn test_splice_appends_past_end() {
        let cache = build("a");
        let validator = Validator::default();
        let replacement = render_records(&[" ", "b!"], &validator, cache.text_len());
        let spliced = cache.splice(1, 1, replacement);
        assert_eq!(spliced.len(), 3);
        assert_contiguous(&spliced);
        assert_eq!(spliced.invalid_count(), 1);
    }

    #[test]
    fn test_record_len() {
        let cache = build("hello");
        assert_eq!(cache.get(0).map(NodeRecord::char_len), Some(5));
    }
}
