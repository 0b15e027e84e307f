// Exclusions: inputs that produced no profile, surfaced to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::corpus::{AuthorId, DocumentId};

use super::frequency::ProfileError;

/// What was left out of ranking. Orders authors first, then known
/// documents, then unknown documents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExcludedSubject {
    /// A known author whose documents hold no words at all.
    Author { author: AuthorId },
    /// A known document with no words (its author may still be ranked).
    KnownDocument {
        author: AuthorId,
        document: DocumentId,
    },
    /// A document to attribute that has no words.
    UnknownDocument { document: DocumentId },
}

/// An input with no profile, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    pub subject: ExcludedSubject,
    pub reason: ProfileError,
}

impl Exclusion {
    pub fn no_words(subject: ExcludedSubject) -> Self {
        Self {
            subject,
            reason: ProfileError::DivisionUndefined,
        }
    }
}

impl fmt::Display for ExcludedSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExcludedSubject::Author { author } => write!(f, "author {author}"),
            ExcludedSubject::KnownDocument { author, document } => {
                write!(f, "known document {document} ({author})")
            }
            ExcludedSubject::UnknownDocument { document } => {
                write!(f, "unknown document {document}")
            }
        }
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.reason)
    }
}
