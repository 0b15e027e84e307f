// Feature classifier: maps a token to the categories it counts toward.
//
// Case policy: every lookup runs on the lowercased token, and common-word
// keys are lowercased too, so "The" and "the" are the same feature.
// Typographic apostrophes are folded to ASCII before lookup.

use super::category::Category;
use super::language::CategoryTables;

/// Normalize a raw token for category lookup.
pub fn normalize(token: &str) -> String {
    token.to_lowercase().replace('\u{2019}', "'")
}

/// Classifies tokens against one language's tables.
pub struct Classifier<'a> {
    tables: &'a CategoryTables,
}

impl<'a> Classifier<'a> {
    pub fn new(tables: &'a CategoryTables) -> Self {
        Self { tables }
    }

    /// Categories a raw token belongs to.
    ///
    /// Empty tokens have no categories. Overlapping tables are not
    /// deduplicated: a word listed as both conjunction and preposition yields
    /// both. A token that matches no closed table yields exactly one
    /// `CommonWord`. Word-count is not included; every non-empty token counts
    /// toward it regardless of the outcome here.
    pub fn classify(&self, token: &str) -> Vec<Category> {
        let word = normalize(token);
        if word.is_empty() {
            return Vec::new();
        }
        self.classify_normalized(word)
    }

    /// Same as [`classify`](Self::classify) for a token already passed
    /// through [`normalize`].
    pub fn classify_normalized(&self, word: String) -> Vec<Category> {
        let mut categories: Vec<Category> = Category::CLOSED
            .iter()
            .filter(|category| {
                self.tables
                    .table(category)
                    .is_some_and(|set| set.contains(&word))
            })
            .cloned()
            .collect();

        if categories.is_empty() {
            categories.push(Category::CommonWord(word));
        }
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::language::LanguageRegistry;

    fn english() -> CategoryTables {
        LanguageRegistry::builtin().get("en").unwrap().clone()
    }

    #[test]
    fn test_case_insensitive_closed_lookup() {
        let tables = english();
        let classifier = Classifier::new(&tables);
        assert_eq!(classifier.classify("The"), vec![Category::Article]);
        assert_eq!(classifier.classify("WERE"), vec![Category::Verb]);
    }

    #[test]
    fn test_overlap_yields_every_category() {
        let tables = english();
        let classifier = Classifier::new(&tables);
        // "but" is listed as both a conjunction and a preposition
        assert_eq!(
            classifier.classify("but"),
            vec![Category::Conjunction, Category::Preposition]
        );
    }

    #[test]
    fn test_unmatched_is_lowercased_common_word() {
        let tables = english();
        let classifier = Classifier::new(&tables);
        assert_eq!(
            classifier.classify("Whale"),
            vec![Category::CommonWord("whale".to_string())]
        );
    }

    #[test]
    fn test_closed_match_excludes_common_word() {
        let tables = english();
        let classifier = Classifier::new(&tables);
        let categories = classifier.classify("didn\u{2019}t");
        assert_eq!(categories, vec![Category::Verb]);
        assert!(!categories.iter().any(Category::is_common_word));
    }

    #[test]
    fn test_empty_token_has_no_categories() {
        let tables = english();
        let classifier = Classifier::new(&tables);
        assert!(classifier.classify("").is_empty());
    }

    #[test]
    fn test_italian_elided_article() {
        let registry = LanguageRegistry::builtin();
        let classifier = Classifier::new(registry.get("it").unwrap());
        assert_eq!(classifier.classify("L'uomo"), vec![Category::Article]);
        assert_eq!(classifier.classify("d'altra"), vec![Category::Preposition]);
    }
}
