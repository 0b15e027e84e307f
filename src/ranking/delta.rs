// Delta: standardized distance between two profiles.
//
// Each ratio is turned into a z-score against the known corpus statistics,
// then the distance is the sum of absolute z differences. A feature missing
// from one side contributes a z of zero for that side.
//
// This differs from the corpus statistics, where an author who never uses a
// common word enters the mean and spread with a ratio of 0. Here a profile
// without the word sits at z = 0, the corpus mean, not at the z of ratio 0.
// An absent common word therefore adds no distance on its own side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::category::Category;
use crate::profile::frequency::FrequencyProfile;

use super::stats::CorpusStatistics;

/// A profile expressed as z-scores over the ranking features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandardizedProfile {
    z: BTreeMap<Category, f64>,
}

impl StandardizedProfile {
    /// Standardize a profile. Categories that are not ranking features are
    /// dropped.
    pub fn new(profile: &FrequencyProfile, stats: &CorpusStatistics) -> Self {
        let z = profile
            .ratios
            .iter()
            .filter_map(|(category, ratio)| {
                stats
                    .z_score(category, *ratio)
                    .map(|z| (category.clone(), z))
            })
            .collect();
        Self { z }
    }

    pub fn z(&self, category: &Category) -> Option<f64> {
        self.z.get(category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, f64)> {
        self.z.iter().map(|(c, z)| (c, *z))
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }
}

impl FromIterator<(Category, f64)> for StandardizedProfile {
    fn from_iter<I: IntoIterator<Item = (Category, f64)>>(iter: I) -> Self {
        Self {
            z: iter.into_iter().collect(),
        }
    }
}

/// Delta distance: sum of |z_a - z_b| over categories in either profile.
///
/// Symmetric, non-negative, and zero for identical profiles.
pub fn delta(a: &StandardizedProfile, b: &StandardizedProfile) -> f64 {
    let shared_and_left: f64 = a
        .z
        .iter()
        .map(|(category, za)| (za - b.z(category).unwrap_or(0.0)).abs())
        .sum();
    let right_only: f64 = b
        .z
        .iter()
        .filter(|(category, _)| !a.z.contains_key(*category))
        .map(|(_, zb)| zb.abs())
        .sum();
    shared_and_left + right_only
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z(entries: &[(Category, f64)]) -> StandardizedProfile {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_self_distance_is_zero() {
        let p = z(&[(Category::Article, 1.5), (Category::Verb, -0.25)]);
        assert_eq!(delta(&p, &p), 0.0);
    }

    #[test]
    fn test_sum_of_absolute_differences() {
        let a = z(&[(Category::Article, 1.0), (Category::Verb, -1.0)]);
        let b = z(&[(Category::Article, -0.5), (Category::Verb, 0.5)]);
        assert!((delta(&a, &b) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_side_counts_as_zero() {
        let word = Category::CommonWord("whale".to_string());
        let a = z(&[(Category::Article, 1.0), (word.clone(), 2.0)]);
        let b = z(&[(Category::Article, 1.0), (Category::Comma, -0.5)]);
        // |2 - 0| + |0 - (-0.5)|
        assert!((delta(&a, &b) - 2.5).abs() < 1e-12);
        assert_eq!(delta(&a, &b), delta(&b, &a));
    }
}
