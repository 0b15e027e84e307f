// Feature counts: per-document category tallies and their merge.
//
// Counts only ever grow. `merge` is plain per-key addition, so it is
// commutative and associative: partial tables built on different threads
// (or different machines) combine to the same result in any order or
// grouping. That is the only property the parallel extraction relies on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::corpus::DocumentId;
use crate::features::category::Category;

/// Category counts for one document (or one merged group of documents).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureCounts {
    counts: BTreeMap<Category, u64>,
}

impl FeatureCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, category: Category) {
        self.add(category, 1);
    }

    /// Add `n` to a category. Adding zero creates no entry.
    pub fn add(&mut self, category: Category, n: u64) {
        if n == 0 {
            return;
        }
        *self.counts.entry(category).or_insert(0) += n;
    }

    /// Checked form of [`add`](Self::add). Returns the new total, or `None`
    /// (leaving the count unchanged) when it would overflow.
    pub fn try_add(&mut self, category: Category, n: u64) -> Option<u64> {
        let total = self.get(&category).checked_add(n)?;
        if total > 0 {
            self.counts.insert(category, total);
        }
        Some(total)
    }

    pub fn get(&self, category: &Category) -> u64 {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn word_count(&self) -> u64 {
        self.get(&Category::WordCount)
    }

    /// Sum of the five closed grammatical categories.
    pub fn closed_total(&self) -> u64 {
        Category::CLOSED.iter().map(|c| self.get(c)).sum()
    }

    /// Sum of all common-word categories.
    pub fn common_total(&self) -> u64 {
        self.counts
            .iter()
            .filter(|(c, _)| c.is_common_word())
            .map(|(_, n)| n)
            .sum()
    }

    /// Fold another table into this one.
    pub fn merge(&mut self, other: &FeatureCounts) {
        for (category, n) in &other.counts {
            self.add(category.clone(), *n);
        }
    }

    /// Owned form of [`merge`](Self::merge), convenient for reductions.
    pub fn merged(mut self, other: FeatureCounts) -> FeatureCounts {
        if self.counts.len() < other.counts.len() {
            let mut larger = other;
            larger.merge(&self);
            return larger;
        }
        self.merge(&other);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, u64)> {
        self.counts.iter().map(|(c, n)| (c, *n))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(Category, u64)> for FeatureCounts {
    fn from_iter<I: IntoIterator<Item = (Category, u64)>>(iter: I) -> Self {
        let mut counts = FeatureCounts::new();
        for (category, n) in iter {
            counts.add(category, n);
        }
        counts
    }
}

/// Counts for every document of a group, keyed by document id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountTable {
    documents: BTreeMap<DocumentId, FeatureCounts>,
}

impl CountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one (document, category, +n) event.
    pub fn record(&mut self, document: &DocumentId, category: Category, n: u64) {
        self.documents
            .entry(document.clone())
            .or_default()
            .add(category, n);
    }

    /// Checked form of [`record`](Self::record). The document entry exists
    /// afterwards either way; `None` means the count would overflow.
    pub fn try_record(&mut self, document: &DocumentId, category: Category, n: u64) -> Option<u64> {
        self.documents
            .entry(document.clone())
            .or_default()
            .try_add(category, n)
    }

    /// Aggregate a stream of unit events, in any order.
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = (DocumentId, Category)>,
    {
        let mut table = CountTable::new();
        for (document, category) in events {
            table.record(&document, category, 1);
        }
        table
    }

    /// Single-document table.
    pub fn single(document: DocumentId, counts: FeatureCounts) -> Self {
        let mut table = CountTable::new();
        table.insert(document, counts);
        table
    }

    /// Merge a document's counts into the table, adding to any existing entry.
    pub fn insert(&mut self, document: DocumentId, counts: FeatureCounts) {
        match self.documents.get_mut(&document) {
            Some(existing) => existing.merge(&counts),
            None => {
                self.documents.insert(document, counts);
            }
        }
    }

    /// Fold another partial table into this one.
    pub fn merge(&mut self, other: CountTable) {
        for (document, counts) in other.documents {
            self.insert(document, counts);
        }
    }

    /// Owned form of [`merge`](Self::merge), convenient for reductions.
    pub fn merged(mut self, other: CountTable) -> CountTable {
        self.merge(other);
        self
    }

    pub fn get(&self, document: &DocumentId) -> Option<&FeatureCounts> {
        self.documents.get(document)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &FeatureCounts)> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl IntoIterator for CountTable {
    type Item = (DocumentId, FeatureCounts);
    type IntoIter = std::collections::btree_map::IntoIter<DocumentId, FeatureCounts>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> DocumentId {
        DocumentId::new(id)
    }

    #[test]
    fn test_increment_and_get() {
        let mut counts = FeatureCounts::new();
        counts.increment(Category::Article);
        counts.increment(Category::Article);
        counts.increment(Category::WordCount);
        assert_eq!(counts.get(&Category::Article), 2);
        assert_eq!(counts.word_count(), 1);
        assert_eq!(counts.get(&Category::Verb), 0);
    }

    #[test]
    fn test_add_zero_creates_no_entry() {
        let mut counts = FeatureCounts::new();
        counts.add(Category::Comma, 0);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_merge_adds_per_key() {
        let a: FeatureCounts = [(Category::Article, 2), (Category::WordCount, 5)]
            .into_iter()
            .collect();
        let b: FeatureCounts = [(Category::Article, 1), (Category::Verb, 3)]
            .into_iter()
            .collect();
        let merged = a.clone().merged(b.clone());
        assert_eq!(merged.get(&Category::Article), 3);
        assert_eq!(merged.get(&Category::Verb), 3);
        assert_eq!(merged.word_count(), 5);
        assert_eq!(merged, b.merged(a));
    }

    #[test]
    fn test_table_from_events_matches_partial_merge() {
        let events = vec![
            (doc("a"), Category::Article),
            (doc("b"), Category::Verb),
            (doc("a"), Category::WordCount),
            (doc("a"), Category::Article),
        ];
        let whole = CountTable::from_events(events.clone());

        let left = CountTable::from_events(events[..2].to_vec());
        let right = CountTable::from_events(events[2..].to_vec());
        assert_eq!(right.merged(left), whole);

        assert_eq!(whole.get(&doc("a")).unwrap().get(&Category::Article), 2);
        assert_eq!(whole.len(), 2);
    }

    #[test]
    fn test_counts_serialize_with_category_names() {
        let counts: FeatureCounts = [
            (Category::WordCount, 4),
            (Category::CommonWord("sea".to_string()), 1),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"nwords":4,"commons:sea":1}"#);
        let back: FeatureCounts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counts);
    }
}
