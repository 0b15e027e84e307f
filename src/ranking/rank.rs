// Ranking: Delta scores of one unknown document against every known author.
//
// The engine is built once from the author profiles: it fixes the ranking
// features, computes the corpus statistics and standardizes every author.
// Each unknown document is then standardized with the same statistics and
// scored against all authors. Lower is closer.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::corpus::{AuthorId, DocumentId};
use crate::profile::author::AuthorProfile;
use crate::profile::frequency::FrequencyProfile;

use super::delta::{delta, StandardizedProfile};
use super::stats::{select_features, CorpusStatistics, Spread};

/// Default cap on common-word features.
pub const DEFAULT_MAX_COMMON_WORDS: usize = 150;

/// Knobs for the Delta computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaOptions {
    pub spread: Spread,
    /// Keep only this many of the most frequent common words (`None` = all).
    pub max_common_words: Option<usize>,
}

impl Default for DeltaOptions {
    fn default() -> Self {
        Self {
            spread: Spread::default(),
            max_common_words: Some(DEFAULT_MAX_COMMON_WORDS),
        }
    }
}

/// One author's distance from an unknown document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAuthor {
    pub author: AuthorId,
    pub score: f64,
}

/// All authors ordered by ascending Delta for one unknown document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub document: DocumentId,
    pub word_count: u64,
    pub entries: Vec<RankedAuthor>,
}

impl Ranking {
    /// Sort entries by score, then by author id so ties are stable.
    pub fn new(document: DocumentId, word_count: u64, mut entries: Vec<RankedAuthor>) -> Self {
        entries.sort_by(compare_entries);
        Self {
            document,
            word_count,
            entries,
        }
    }

    /// The attributed author: the minimum Delta.
    pub fn best(&self) -> Option<&RankedAuthor> {
        self.entries.first()
    }

    /// Delta for a specific author.
    pub fn score_for(&self, author: &AuthorId) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| &e.author == author)
            .map(|e| e.score)
    }

    /// Whether the best match is strictly closer than the runner-up.
    pub fn is_unique_best(&self) -> bool {
        match self.entries.as_slice() {
            [] => false,
            [_] => true,
            [first, second, ..] => first.score < second.score,
        }
    }
}

fn compare_entries(a: &RankedAuthor, b: &RankedAuthor) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| a.author.cmp(&b.author))
}

/// Scores unknown profiles against a fixed set of known authors.
#[derive(Debug, Clone)]
pub struct DeltaEngine {
    statistics: CorpusStatistics,
    authors: Vec<(AuthorId, StandardizedProfile)>,
}

impl DeltaEngine {
    pub fn new(profiles: &[AuthorProfile], options: &DeltaOptions) -> Self {
        let features = select_features(profiles, options.max_common_words);
        let statistics = CorpusStatistics::compute(profiles, &features, options.spread);
        let authors = profiles
            .iter()
            .map(|p| {
                (
                    p.author.clone(),
                    StandardizedProfile::new(&p.profile, &statistics),
                )
            })
            .collect();

        info!(
            authors = profiles.len(),
            features = statistics.len(),
            spread = %options.spread,
            "Computed corpus statistics"
        );

        Self {
            statistics,
            authors,
        }
    }

    pub fn statistics(&self) -> &CorpusStatistics {
        &self.statistics
    }

    /// Standardized profile of a known author.
    pub fn author(&self, author: &AuthorId) -> Option<&StandardizedProfile> {
        self.authors
            .iter()
            .find(|(id, _)| id == author)
            .map(|(_, z)| z)
    }

    pub fn standardize(&self, profile: &FrequencyProfile) -> StandardizedProfile {
        StandardizedProfile::new(profile, &self.statistics)
    }

    /// Rank every known author for one unknown document's profile.
    pub fn rank(&self, document: DocumentId, profile: &FrequencyProfile) -> Ranking {
        let unknown = self.standardize(profile);
        let entries = self
            .authors
            .iter()
            .map(|(author, z)| RankedAuthor {
                author: author.clone(),
                score: delta(&unknown, z),
            })
            .collect();
        Ranking::new(document, profile.word_count, entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(author: &str, score: f64) -> RankedAuthor {
        RankedAuthor {
            author: AuthorId::new(author),
            score,
        }
    }

    #[test]
    fn test_ranking_sorted_ascending() {
        let ranking = Ranking::new(
            DocumentId::new("x.txt"),
            10,
            vec![entry("b", 3.0), entry("a", 1.0), entry("c", 2.0)],
        );
        let order: Vec<&str> = ranking.entries.iter().map(|e| e.author.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
        assert_eq!(ranking.best().unwrap().author.as_str(), "a");
        assert!(ranking.is_unique_best());
    }

    #[test]
    fn test_ties_broken_by_author() {
        let ranking = Ranking::new(
            DocumentId::new("x.txt"),
            10,
            vec![entry("zed", 1.0), entry("amy", 1.0)],
        );
        assert_eq!(ranking.best().unwrap().author.as_str(), "amy");
        assert!(!ranking.is_unique_best());
        assert_eq!(ranking.score_for(&AuthorId::new("zed")), Some(1.0));
    }

    #[test]
    fn test_empty_ranking_has_no_best() {
        let ranking = Ranking::new(DocumentId::new("x.txt"), 10, vec![]);
        assert!(ranking.best().is_none());
        assert!(!ranking.is_unique_best());
    }
}
