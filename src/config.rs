use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::features::language::{LanguageRegistry, LanguageSelector};
use crate::ranking::rank::DEFAULT_MAX_COMMON_WORDS;
use crate::ranking::stats::Spread;

/// Language value that turns on per-line telltale detection.
pub const AUTO_LANGUAGE: &str = "auto";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy; CLI flags override
/// whatever is set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Language id, or "auto" for per-line detection (QUILLMARK_LANGUAGE)
    pub language: String,
    /// Spread statistic for standardization (QUILLMARK_SPREAD)
    pub spread: Spread,
    /// Extra category tables layered over the built-ins (QUILLMARK_TABLES)
    pub tables_path: Option<PathBuf>,
    /// Cap on common-word features, `None` for no cap (QUILLMARK_MAX_COMMON_WORDS)
    pub max_common_words: Option<usize>,
    /// Where reports and count artifacts go (QUILLMARK_OUTPUT_DIR)
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let spread = match env::var("QUILLMARK_SPREAD") {
            Ok(value) => value.parse().map_err(anyhow::Error::msg)?,
            Err(_) => Spread::default(),
        };

        let max_common_words = match env::var("QUILLMARK_MAX_COMMON_WORDS") {
            Ok(value) => parse_max_common_words(&value)?,
            Err(_) => Some(DEFAULT_MAX_COMMON_WORDS),
        };

        Ok(Self {
            language: env::var("QUILLMARK_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            spread,
            tables_path: env::var("QUILLMARK_TABLES").ok().map(PathBuf::from),
            max_common_words,
            output_dir: env::var("QUILLMARK_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./quillmark-output")),
        })
    }

    /// Built-in tables, extended by the configured tables file if any.
    pub fn registry(&self) -> Result<LanguageRegistry> {
        let mut registry = LanguageRegistry::builtin();
        if let Some(path) = &self.tables_path {
            registry.extend(LanguageRegistry::load_file(path)?);
        }
        Ok(registry)
    }

    /// The language selector this configuration asks for.
    ///
    /// "auto" tries every configured language except the fallback "en"
    /// (or the first configured one) by telltale words, line by line.
    pub fn selector(&self, registry: &LanguageRegistry) -> LanguageSelector {
        if self.language != AUTO_LANGUAGE {
            return LanguageSelector::Fixed(self.language.clone());
        }
        let ids: Vec<String> = registry.languages().map(|(id, _)| id.to_string()).collect();
        let fallback = if registry.contains("en") {
            "en".to_string()
        } else {
            ids.first().cloned().unwrap_or_default()
        };
        LanguageSelector::Telltale {
            candidates: ids.into_iter().filter(|id| *id != fallback).collect(),
            fallback,
        }
    }

    /// Check that the requested language has tables.
    /// Call this at startup, before reading any documents.
    pub fn require_language(&self, registry: &LanguageRegistry) -> Result<LanguageSelector> {
        let selector = self.selector(registry);
        selector.validate(registry).with_context(|| {
            let known: Vec<&str> = registry.languages().map(|(id, _)| id).collect();
            format!(
                "Language {:?} is not configured. Available: {}.\n\
                 Set QUILLMARK_LANGUAGE or add tables via QUILLMARK_TABLES.",
                self.language,
                known.join(", ")
            )
        })?;
        Ok(selector)
    }
}

/// Parse a common-word cap; "0" means unlimited.
pub fn parse_max_common_words(value: &str) -> Result<Option<usize>> {
    let n: usize = value
        .trim()
        .parse()
        .with_context(|| format!("QUILLMARK_MAX_COMMON_WORDS must be a number, got {value:?}"))?;
    Ok(if n == 0 { None } else { Some(n) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(language: &str) -> Config {
        Config {
            language: language.to_string(),
            spread: Spread::default(),
            tables_path: None,
            max_common_words: Some(DEFAULT_MAX_COMMON_WORDS),
            output_dir: PathBuf::from("out"),
        }
    }

    #[test]
    fn test_fixed_language_selector() {
        let registry = LanguageRegistry::builtin();
        let selector = config("it").require_language(&registry).unwrap();
        assert_eq!(selector, LanguageSelector::Fixed("it".to_string()));
    }

    #[test]
    fn test_auto_language_falls_back_to_english() {
        let registry = LanguageRegistry::builtin();
        let selector = config(AUTO_LANGUAGE).require_language(&registry).unwrap();
        assert_eq!(
            selector,
            LanguageSelector::Telltale {
                candidates: vec!["it".to_string()],
                fallback: "en".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_language_is_fatal() {
        let registry = LanguageRegistry::builtin();
        let err = config("klingon").require_language(&registry).unwrap_err();
        assert!(format!("{err:#}").contains("klingon"));
    }

    #[test]
    fn test_parse_max_common_words() {
        assert_eq!(parse_max_common_words("0").unwrap(), None);
        assert_eq!(parse_max_common_words(" 40 ").unwrap(), Some(40));
        assert!(parse_max_common_words("lots").is_err());
    }
}
