// Category: the closed set of stylometric feature buckets.
//
// Closed grammatical categories come from the language tables. Every word
// that matches none of them is tracked individually as a common word, so the
// long tail of vocabulary frequencies ends up in the profile too.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const COMMON_PREFIX: &str = "commons:";

/// A feature bucket that counts are kept for.
///
/// Ordering is derived so that count tables and reports iterate in a stable
/// order: closed categories first, then the punctuation and word-count
/// buckets, then common words alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Category {
    Article,
    Conjunction,
    Preposition,
    Pronoun,
    Verb,
    SentenceTerminator,
    Comma,
    WordCount,
    CommonWord(String),
}

impl Category {
    /// The five closed grammatical categories, in table order.
    pub const CLOSED: [Category; 5] = [
        Category::Article,
        Category::Conjunction,
        Category::Preposition,
        Category::Pronoun,
        Category::Verb,
    ];

    /// Wire name used in the persisted count artifact and in reports.
    pub fn name(&self) -> String {
        match self {
            Category::CommonWord(word) => format!("{COMMON_PREFIX}{word}"),
            other => other.static_name().to_string(),
        }
    }

    fn static_name(&self) -> &'static str {
        match self {
            Category::Article => "articles",
            Category::Conjunction => "conjunctions",
            Category::Preposition => "prepositions",
            Category::Pronoun => "pronouns",
            Category::Verb => "verbs",
            Category::SentenceTerminator => "periods",
            Category::Comma => "commas",
            Category::WordCount => "nwords",
            Category::CommonWord(_) => COMMON_PREFIX,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            Category::Article
                | Category::Conjunction
                | Category::Preposition
                | Category::Pronoun
                | Category::Verb
        )
    }

    pub fn is_common_word(&self) -> bool {
        matches!(self, Category::CommonWord(_))
    }

    /// Whether this category becomes a dimension of a frequency profile.
    /// Word-count is the denominator, so its ratio is always 1.
    pub fn is_profile_dimension(&self) -> bool {
        !matches!(self, Category::WordCount)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::CommonWord(word) => write!(f, "{COMMON_PREFIX}{word}"),
            other => f.write_str(other.static_name()),
        }
    }
}

/// Error returned when a category name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category name: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s {
            "articles" => Category::Article,
            "conjunctions" => Category::Conjunction,
            "prepositions" => Category::Preposition,
            "pronouns" => Category::Pronoun,
            "verbs" => Category::Verb,
            "periods" => Category::SentenceTerminator,
            "commas" => Category::Comma,
            "nwords" => Category::WordCount,
            other => match other.strip_prefix(COMMON_PREFIX) {
                Some(word) if !word.is_empty() => Category::CommonWord(word.to_string()),
                _ => return Err(UnknownCategory(s.to_string())),
            },
        };
        Ok(category)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.name()
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for category in [
            Category::Article,
            Category::Conjunction,
            Category::Preposition,
            Category::Pronoun,
            Category::Verb,
            Category::SentenceTerminator,
            Category::Comma,
            Category::WordCount,
            Category::CommonWord("whale".to_string()),
        ] {
            let parsed: Category = category.name().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_bare_common_prefix_rejected() {
        assert!("commons:".parse::<Category>().is_err());
        assert!("adverbs".parse::<Category>().is_err());
    }

    #[test]
    fn test_common_words_sort_after_fixed_categories() {
        let mut categories = vec![
            Category::CommonWord("abc".to_string()),
            Category::WordCount,
            Category::Article,
        ];
        categories.sort();
        assert_eq!(categories[0], Category::Article);
        assert_eq!(categories[2], Category::CommonWord("abc".to_string()));
    }

    #[test]
    fn test_serde_uses_wire_name() {
        let json = serde_json::to_string(&Category::CommonWord("sea".to_string())).unwrap();
        assert_eq!(json, "\"commons:sea\"");
        let back: Category = serde_json::from_str("\"periods\"").unwrap();
        assert_eq!(back, Category::SentenceTerminator);
    }
}
