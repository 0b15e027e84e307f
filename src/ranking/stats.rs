// Corpus statistics: per-feature mean and spread across known authors.
//
// The standardized distance needs, for each feature, where the known authors
// sit on average and how far they scatter. Unknown documents never feed into
// these numbers; they are measured against the known corpus only.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::features::category::Category;
use crate::profile::author::AuthorProfile;
use crate::profile::frequency::fixed_dimensions;

/// Spreads at or below this are treated as zero (constant feature).
/// Ratios live in [0, 1], so an absolute threshold is enough to absorb
/// floating-point noise from the mean.
pub const ZERO_SPREAD: f64 = 1e-12;

/// Which dispersion statistic standardizes a feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spread {
    /// Mean absolute deviation from the mean.
    #[default]
    MeanAbsoluteDeviation,
    /// Population standard deviation.
    StandardDeviation,
}

impl Spread {
    /// Dispersion of `values` around `mean`. Zero for an empty slice.
    pub fn of(&self, values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let n = values.len() as f64;
        match self {
            Spread::MeanAbsoluteDeviation => {
                values.iter().map(|v| (v - mean).abs()).sum::<f64>() / n
            }
            Spread::StandardDeviation => {
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                variance.sqrt()
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Spread::MeanAbsoluteDeviation => "mad",
            Spread::StandardDeviation => "std",
        }
    }
}

impl fmt::Display for Spread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Spread {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mad" | "mean-absolute-deviation" => Ok(Spread::MeanAbsoluteDeviation),
            "std" | "sd" | "standard-deviation" => Ok(Spread::StandardDeviation),
            other => Err(format!(
                "unknown spread statistic {other:?} (expected `mad` or `std`)"
            )),
        }
    }
}

/// Mean and spread of one feature across authors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStat {
    pub mean: f64,
    pub spread: f64,
}

impl FeatureStat {
    /// Standardize a ratio. A constant feature carries no signal, so its
    /// z-score is zero.
    pub fn z(&self, ratio: f64) -> f64 {
        if self.spread <= ZERO_SPREAD {
            0.0
        } else {
            (ratio - self.mean) / self.spread
        }
    }
}

/// Pick the features that take part in ranking.
///
/// All fixed dimensions, plus the `max_common_words` common words with the
/// highest merged count over every known author (ties broken by word);
/// `None` keeps every common word.
pub fn select_features(authors: &[AuthorProfile], max_common_words: Option<usize>) -> Vec<Category> {
    let mut totals: HashMap<&Category, u64> = HashMap::new();
    for author in authors {
        for (category, n) in author.counts.iter() {
            if category.is_common_word() {
                *totals.entry(category).or_insert(0) += n;
            }
        }
    }

    let mut common: Vec<(&Category, u64)> = totals.into_iter().collect();
    common.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    if let Some(max) = max_common_words {
        common.truncate(max);
    }

    let mut features: Vec<Category> = fixed_dimensions().into_iter().collect();
    features.extend(common.into_iter().map(|(category, _)| category.clone()));
    features
}

/// Per-feature statistics over the known authors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusStatistics {
    pub spread: Spread,
    pub author_count: usize,
    pub features: BTreeMap<Category, FeatureStat>,
}

impl CorpusStatistics {
    /// Compute mean and spread of each feature. An author that never uses a
    /// feature contributes a ratio of zero.
    pub fn compute(authors: &[AuthorProfile], features: &[Category], spread: Spread) -> Self {
        let mut stats = BTreeMap::new();
        for category in features {
            let values: Vec<f64> = authors
                .iter()
                .map(|a| a.profile.ratio(category).unwrap_or(0.0))
                .collect();
            let mean = if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            };
            stats.insert(
                category.clone(),
                FeatureStat {
                    mean,
                    spread: spread.of(&values, mean),
                },
            );
        }

        Self {
            spread,
            author_count: authors.len(),
            features: stats,
        }
    }

    pub fn get(&self, category: &Category) -> Option<&FeatureStat> {
        self.features.get(category)
    }

    /// z-score of a ratio, `None` when the category is not a ranking feature.
    pub fn z_score(&self, category: &Category, ratio: f64) -> Option<f64> {
        self.features.get(category).map(|stat| stat.z(ratio))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
