// Per-document feature extraction: the function each worker runs.
//
// For every line: pick the language tables, tokenize, classify each token,
// then run the two punctuation scans over the raw line. The result is the
// document's category -> count map. Extraction holds no shared mutable
// state, so documents can be processed in parallel and merged afterwards.

use anyhow::{Context, Result};

use crate::counts::table::FeatureCounts;

use super::category::Category;
use super::classifier::{self, Classifier};
use super::language::{LanguageRegistry, LanguageSelector};
use super::tokenizer::{self, PunctuationPatterns};

/// Everything needed to turn raw text into feature counts.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    registry: LanguageRegistry,
    selector: LanguageSelector,
    punctuation: PunctuationPatterns,
}

impl FeatureExtractor {
    /// Build an extractor with the standard punctuation patterns.
    ///
    /// Fails if the selector names a language without tables.
    pub fn new(registry: LanguageRegistry, selector: LanguageSelector) -> Result<Self> {
        let punctuation =
            PunctuationPatterns::standard().context("compiling punctuation patterns")?;
        Self::with_punctuation(registry, selector, punctuation)
    }

    pub fn with_punctuation(
        registry: LanguageRegistry,
        selector: LanguageSelector,
        punctuation: PunctuationPatterns,
    ) -> Result<Self> {
        selector
            .validate(&registry)
            .context("language selection is not configured")?;
        Ok(Self {
            registry,
            selector,
            punctuation,
        })
    }

    /// English-only extractor over the built-in tables.
    pub fn english() -> Result<Self> {
        Self::new(
            LanguageRegistry::builtin(),
            LanguageSelector::Fixed("en".to_string()),
        )
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn selector(&self) -> &LanguageSelector {
        &self.selector
    }

    /// Count the features of a whole document.
    pub fn extract(&self, text: &str) -> FeatureCounts {
        let mut counts = FeatureCounts::new();
        for line in text.lines() {
            self.extract_line(line, &mut counts);
        }
        counts
    }

    /// Add one line's features to `counts`.
    pub fn extract_line(&self, line: &str, counts: &mut FeatureCounts) {
        let language = self.selector.select(&self.registry, line);
        // validated at construction
        let Ok(tables) = self.registry.get(language) else {
            return;
        };
        let classifier = Classifier::new(tables);

        for token in tokenizer::tokens(line) {
            let word = classifier::normalize(token);
            if word.is_empty() {
                continue;
            }
            for category in classifier.classify_normalized(word) {
                counts.increment(category);
            }
            counts.increment(Category::WordCount);
        }

        counts.add(
            Category::SentenceTerminator,
            self.punctuation.count_terminators(line),
        );
        counts.add(Category::Comma, self.punctuation.count_commas(line));
    }
}
