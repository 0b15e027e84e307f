// Language tables: per-language category membership for the classifier.
//
// A registry maps a language id ("en", "it", ...) to five word sets plus a
// handful of telltale words used by the optional per-line selector. The
// registry is built once per run and passed down explicitly; nothing here is
// global or mutable after construction.
//
// A table entry ending in an apostrophe is an elision prefix: "l'" matches
// "l'uomo" but not a bare "l'".

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::tokenizer;

/// Errors raised while resolving language tables.
#[derive(Debug, thiserror::Error)]
pub enum LanguageError {
    #[error("no category tables configured for language {language:?}")]
    MissingTable { language: String },
    #[error("invalid category tables: {0}")]
    InvalidTables(#[from] serde_json::Error),
}

/// A set of lowercase words, with optional elision prefixes.
#[derive(Debug, Clone, Default)]
pub struct WordSet {
    exact: HashSet<String>,
    prefixes: Vec<String>,
}

impl WordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = WordSet::default();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            if word.ends_with('\'') {
                set.prefixes.push(word);
            } else {
                set.exact.insert(word);
            }
        }
        set.prefixes.sort();
        set.prefixes.dedup();
        set
    }

    /// Membership test for an already-normalized token.
    pub fn contains(&self, token: &str) -> bool {
        self.exact.contains(token)
            || self
                .prefixes
                .iter()
                .any(|p| token.len() > p.len() && token.starts_with(p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_sorted_vec(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .exact
            .iter()
            .chain(self.prefixes.iter())
            .cloned()
            .collect();
        words.sort();
        words
    }
}

/// The five closed category tables for one language.
#[derive(Debug, Clone, Default)]
pub struct CategoryTables {
    pub articles: WordSet,
    pub conjunctions: WordSet,
    pub prepositions: WordSet,
    pub pronouns: WordSet,
    pub verbs: WordSet,
    /// Frequent function words whose presence suggests this language.
    pub telltales: WordSet,
}

impl CategoryTables {
    /// The word set backing a closed category, `None` for anything else.
    pub fn table(&self, category: &Category) -> Option<&WordSet> {
        match category {
            Category::Article => Some(&self.articles),
            Category::Conjunction => Some(&self.conjunctions),
            Category::Preposition => Some(&self.prepositions),
            Category::Pronoun => Some(&self.pronouns),
            Category::Verb => Some(&self.verbs),
            _ => None,
        }
    }
}

/// Serialized shape of one language's tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSpec {
    pub articles: Vec<String>,
    pub conjunctions: Vec<String>,
    pub prepositions: Vec<String>,
    pub pronouns: Vec<String>,
    pub verbs: Vec<String>,
    pub telltales: Vec<String>,
}

impl From<&TableSpec> for CategoryTables {
    fn from(spec: &TableSpec) -> Self {
        Self {
            articles: WordSet::new(&spec.articles),
            conjunctions: WordSet::new(&spec.conjunctions),
            prepositions: WordSet::new(&spec.prepositions),
            pronouns: WordSet::new(&spec.pronouns),
            verbs: WordSet::new(&spec.verbs),
            telltales: WordSet::new(&spec.telltales),
        }
    }
}

impl From<&CategoryTables> for TableSpec {
    fn from(tables: &CategoryTables) -> Self {
        Self {
            articles: tables.articles.to_sorted_vec(),
            conjunctions: tables.conjunctions.to_sorted_vec(),
            prepositions: tables.prepositions.to_sorted_vec(),
            pronouns: tables.pronouns.to_sorted_vec(),
            verbs: tables.verbs.to_sorted_vec(),
            telltales: tables.telltales.to_sorted_vec(),
        }
    }
}

const EN_ARTICLES: &[&str] = &["the", "a", "an", "one"];
const EN_CONJUNCTIONS: &[&str] = &[
    "and", "or", "not", "but", "yet", "though", "when", "how", "so", "if", "very", "then", "some",
    "no",
];
const EN_PREPOSITIONS: &[&str] = &[
    "of", "to", "from", "in", "with", "on", "for", "between", "at", "by", "like", "but", "as",
    "out", "about", "there", "up", "down", "now", "after", "little", "more", "over",
];
const EN_PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "his", "us", "them", "my",
    "your", "its", "our", "their", "that", "this", "these", "which", "what", "where", "who", "all",
    "any", "other", "into", "upon", "such", "himself",
];
const EN_VERBS: &[&str] = &[
    "is", "are", "be", "been", "was", "were", "have", "has", "had", "do", "don't", "say", "said",
    "says", "would", "could", "make", "made", "should", "did", "didn't", "go", "came", "will",
    "see", "went",
];
const EN_TELLTALES: &[&str] = &["the", "of", "and"];

const IT_ARTICLES: &[&str] = &[
    "il", "lo", "la", "i", "gli", "le", "un", "una", "uno", "l'", "un'", "gl'",
];
const IT_CONJUNCTIONS: &[&str] = &[
    "e", "né", "o", "inoltre", "ma", "però", "dunque", "anzi", "che",
];
const IT_PREPOSITIONS: &[&str] = &[
    "di", "a", "da", "in", "con", "su", "per", "tra", "fra", "d'",
];
const IT_PRONOUNS: &[&str] = &[
    "io", "tu", "lui", "lei", "noi", "voi", "loro", "mi", "ti", "si", "ci", "vi", "questo",
    "questa", "quello", "quella", "chi", "cui", "mio", "mia", "tuo", "tua", "suo", "sua",
];
const IT_VERBS: &[&str] = &[
    "è", "sono", "era", "erano", "essere", "stato", "ho", "ha", "hanno", "aveva", "avere", "fu",
    "fare", "fatto", "dire", "detto", "disse", "può", "deve", "sia",
];
const IT_TELLTALES: &[&str] = &["il", "di", "che"];

fn builtin_spec(
    articles: &[&str],
    conjunctions: &[&str],
    prepositions: &[&str],
    pronouns: &[&str],
    verbs: &[&str],
    telltales: &[&str],
) -> TableSpec {
    fn owned(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }
    TableSpec {
        articles: owned(articles),
        conjunctions: owned(conjunctions),
        prepositions: owned(prepositions),
        pronouns: owned(pronouns),
        verbs: owned(verbs),
        telltales: owned(telltales),
    }
}

/// All configured language tables, keyed by language id.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    tables: BTreeMap<String, CategoryTables>,
}

impl LanguageRegistry {
    /// An empty registry (no languages).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in English ("en") and Italian ("it") tables.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.insert(
            "en",
            CategoryTables::from(&builtin_spec(
                EN_ARTICLES,
                EN_CONJUNCTIONS,
                EN_PREPOSITIONS,
                EN_PRONOUNS,
                EN_VERBS,
                EN_TELLTALES,
            )),
        );
        registry.insert(
            "it",
            CategoryTables::from(&builtin_spec(
                IT_ARTICLES,
                IT_CONJUNCTIONS,
                IT_PREPOSITIONS,
                IT_PRONOUNS,
                IT_VERBS,
                IT_TELLTALES,
            )),
        );
        registry
    }

    /// Parse a JSON object of `{ "<language>": { "articles": [...], ... } }`.
    pub fn from_json(json: &str) -> Result<Self, LanguageError> {
        let specs: BTreeMap<String, TableSpec> = serde_json::from_str(json)?;
        let mut registry = Self::empty();
        for (language, spec) in &specs {
            registry.insert(language, CategoryTables::from(spec));
        }
        Ok(registry)
    }

    /// Read tables from a JSON file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading category tables from {}", path.display()))?;
        let registry = Self::from_json(&json)
            .with_context(|| format!("parsing category tables in {}", path.display()))?;
        Ok(registry)
    }

    /// Serialize every language back to the JSON table shape.
    pub fn to_json(&self) -> Result<String, LanguageError> {
        let specs: BTreeMap<&String, TableSpec> = self
            .tables
            .iter()
            .map(|(language, tables)| (language, TableSpec::from(tables)))
            .collect();
        Ok(serde_json::to_string_pretty(&specs)?)
    }

    pub fn insert(&mut self, language: impl Into<String>, tables: CategoryTables) {
        self.tables.insert(language.into(), tables);
    }

    /// Add every language of `other`, replacing same-id entries.
    pub fn extend(&mut self, other: LanguageRegistry) {
        self.tables.extend(other.tables);
    }

    pub fn get(&self, language: &str) -> Result<&CategoryTables, LanguageError> {
        self.tables
            .get(language)
            .ok_or_else(|| LanguageError::MissingTable {
                language: language.to_string(),
            })
    }

    pub fn contains(&self, language: &str) -> bool {
        self.tables.contains_key(language)
    }

    pub fn languages(&self) -> impl Iterator<Item = (&str, &CategoryTables)> {
        self.tables.iter().map(|(id, tables)| (id.as_str(), tables))
    }
}

/// How the classifier picks the language tables for a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageSelector {
    /// One language for the whole run.
    Fixed(String),
    /// Per line: the first candidate whose telltale words appear among the
    /// line's tokens, else the fallback.
    Telltale {
        candidates: Vec<String>,
        fallback: String,
    },
}

impl LanguageSelector {
    /// Every language id this selector can resolve to.
    pub fn languages(&self) -> Vec<&str> {
        match self {
            LanguageSelector::Fixed(language) => vec![language.as_str()],
            LanguageSelector::Telltale {
                candidates,
                fallback,
            } => candidates
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(fallback.as_str()))
                .collect(),
        }
    }

    /// Check that every language this selector may pick has tables.
    pub fn validate(&self, registry: &LanguageRegistry) -> Result<(), LanguageError> {
        for language in self.languages() {
            registry.get(language)?;
        }
        Ok(())
    }

    /// Resolve the language id for one line.
    pub fn select<'a>(&'a self, registry: &LanguageRegistry, line: &str) -> &'a str {
        match self {
            LanguageSelector::Fixed(language) => language.as_str(),
            LanguageSelector::Telltale {
                candidates,
                fallback,
            } => {
                let words: Vec<String> = tokenizer::tokens(line)
                    .map(super::classifier::normalize)
                    .collect();
                candidates
                    .iter()
                    .find(|candidate| {
                        registry.get(candidate).is_ok_and(|tables| {
                            words.iter().any(|w| tables.telltales.contains(w))
                        })
                    })
                    .map(String::as_str)
                    .unwrap_or(fallback.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_english_and_italian() {
        let registry = LanguageRegistry::builtin();
        assert!(registry.contains("en"));
        assert!(registry.contains("it"));
        assert!(registry.get("fr").is_err());
    }

    #[test]
    fn test_elision_prefix_matching() {
        let set = WordSet::new(["il", "l'"]);
        assert!(set.contains("il"));
        assert!(set.contains("l'uomo"));
        assert!(!set.contains("l'"));
        assert!(!set.contains("lago"));
    }

    #[test]
    fn test_words_lowercased_on_load() {
        let set = WordSet::new(["The", " An "]);
        assert!(set.contains("the"));
        assert!(set.contains("an"));
    }

    #[test]
    fn test_from_json_partial_tables() {
        let registry =
            LanguageRegistry::from_json(r#"{"xx": {"articles": ["ta"], "verbs": ["ve"]}}"#)
                .unwrap();
        let tables = registry.get("xx").unwrap();
        assert!(tables.articles.contains("ta"));
        assert!(tables.verbs.contains("ve"));
        assert!(tables.pronouns.is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(LanguageRegistry::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_words() {
        let registry = LanguageRegistry::builtin();
        let json = registry.to_json().unwrap();
        let back = LanguageRegistry::from_json(&json).unwrap();
        let it = back.get("it").unwrap();
        assert!(it.articles.contains("l'anima"));
        assert_eq!(it.articles.len(), registry.get("it").unwrap().articles.len());
    }

    #[test]
    fn test_telltale_selector() {
        let registry = LanguageRegistry::builtin();
        let selector = LanguageSelector::Telltale {
            candidates: vec!["en".to_string()],
            fallback: "it".to_string(),
        };
        assert_eq!(selector.select(&registry, "The sound of the sea"), "en");
        assert_eq!(selector.select(&registry, "Nel mezzo del cammin"), "it");
        // "theory" is not the telltale "the"
        assert_eq!(selector.select(&registry, "theory"), "it");
    }

    #[test]
    fn test_selector_validation() {
        let registry = LanguageRegistry::builtin();
        assert!(LanguageSelector::Fixed("en".to_string()).validate(&registry).is_ok());
        let bad = LanguageSelector::Telltale {
            candidates: vec!["en".to_string()],
            fallback: "de".to_string(),
        };
        match bad.validate(&registry) {
            Err(LanguageError::MissingTable { language }) => assert_eq!(language, "de"),
            other => panic!("expected missing table, got {other:?}"),
        }
    }
}
