// Corpus: documents with known authors and documents to attribute.

pub mod loader;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one source document (its path relative to the corpus root).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

/// Identifies one known author.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AuthorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document attributed to a known author.
#[derive(Debug, Clone)]
pub struct KnownDocument {
    pub id: DocumentId,
    pub author: AuthorId,
    pub text: String,
}

/// A document whose author is to be determined.
#[derive(Debug, Clone)]
pub struct UnknownDocument {
    pub id: DocumentId,
    pub text: String,
}

/// The two input groups of an attribution run.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub known: Vec<KnownDocument>,
    pub unknown: Vec<UnknownDocument>,
}

impl Corpus {
    pub fn add_known(
        &mut self,
        author: impl Into<String>,
        id: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.known.push(KnownDocument {
            id: DocumentId::new(id),
            author: AuthorId::new(author),
            text: text.into(),
        });
    }

    pub fn add_unknown(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.unknown.push(UnknownDocument {
            id: DocumentId::new(id),
            text: text.into(),
        });
    }

    /// Distinct known authors, sorted.
    pub fn authors(&self) -> Vec<AuthorId> {
        let mut authors: Vec<AuthorId> = self.known.iter().map(|d| d.author.clone()).collect();
        authors.sort();
        authors.dedup();
        authors
    }
}
