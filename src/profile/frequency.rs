// Frequency profile: raw counts normalized by word-count.
//
// Every ratio is count / word-count. The fixed dimensions (closed categories
// and both punctuation buckets) are always present, zero when unused, so two
// profiles always agree on them. Common words appear only when used.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::counts::table::FeatureCounts;
use crate::features::category::Category;

/// Why a profile could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ProfileError {
    /// The document (or author) has no words, so no ratio is defined.
    #[error("word count is zero, frequency ratios are undefined")]
    DivisionUndefined,
}

/// The profile dimensions every frequency profile carries.
pub fn fixed_dimensions() -> [Category; 7] {
    [
        Category::Article,
        Category::Conjunction,
        Category::Preposition,
        Category::Pronoun,
        Category::Verb,
        Category::SentenceTerminator,
        Category::Comma,
    ]
}

/// Normalized category frequencies for one document or author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyProfile {
    pub word_count: u64,
    pub ratios: BTreeMap<Category, f64>,
}

impl FrequencyProfile {
    /// Normalize counts by their word-count.
    ///
    /// Returns `DivisionUndefined` for a zero word-count instead of a zero
    /// vector, which would look similar to everything.
    pub fn from_counts(counts: &FeatureCounts) -> Result<Self, ProfileError> {
        let word_count = counts.word_count();
        if word_count == 0 {
            return Err(ProfileError::DivisionUndefined);
        }
        let total = word_count as f64;

        let mut ratios: BTreeMap<Category, f64> = fixed_dimensions()
            .into_iter()
            .map(|category| (category, 0.0))
            .collect();
        for (category, n) in counts.iter() {
            if category.is_profile_dimension() {
                ratios.insert(category.clone(), n as f64 / total);
            }
        }

        Ok(Self { word_count, ratios })
    }

    /// Ratio for a category, `None` when the category is not in the profile.
    pub fn ratio(&self, category: &Category) -> Option<f64> {
        self.ratios.get(category).copied()
    }

    /// Common-word ratios sorted from most to least frequent.
    pub fn top_common_words(&self, n: usize) -> Vec<(&str, f64)> {
        let mut words: Vec<(&str, f64)> = self
            .ratios
            .iter()
            .filter_map(|(category, ratio)| match category {
                Category::CommonWord(word) => Some((word.as_str(), *ratio)),
                _ => None,
            })
            .collect();
        words.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words.truncate(n);
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(Category, u64)]) -> FeatureCounts {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_ratios_divide_by_word_count() {
        let profile = FrequencyProfile::from_counts(&counts(&[
            (Category::WordCount, 50),
            (Category::Article, 4),
            (Category::CommonWord("sea".to_string()), 1),
        ]))
        .unwrap();
        assert_eq!(profile.word_count, 50);
        assert!((profile.ratio(&Category::Article).unwrap() - 0.08).abs() < 1e-12);
        assert!((profile.ratio(&Category::CommonWord("sea".to_string())).unwrap() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_dimensions_always_present() {
        let profile =
            FrequencyProfile::from_counts(&counts(&[(Category::WordCount, 3)])).unwrap();
        assert_eq!(profile.ratio(&Category::Verb), Some(0.0));
        assert_eq!(profile.ratio(&Category::Comma), Some(0.0));
        assert_eq!(profile.ratio(&Category::WordCount), None);
        assert_eq!(profile.ratio(&Category::CommonWord("x".to_string())), None);
    }

    #[test]
    fn test_zero_words_is_division_undefined() {
        let result = FrequencyProfile::from_counts(&counts(&[(Category::Comma, 2)]));
        assert_eq!(result, Err(ProfileError::DivisionUndefined));
    }

    #[test]
    fn test_top_common_words_order() {
        let profile = FrequencyProfile::from_counts(&counts(&[
            (Category::WordCount, 10),
            (Category::CommonWord("b".to_string()), 2),
            (Category::CommonWord("a".to_string()), 2),
            (Category::CommonWord("c".to_string()), 5),
        ]))
        .unwrap();
        let top = profile.top_common_words(2);
        assert_eq!(top, vec![("c", 0.5), ("a", 0.2)]);
    }
}
