// Author profiles: one aggregate profile per known author.
//
// An author's documents are merged at the count level first and normalized
// once, so a long novel and a short letter weigh by their word counts rather
// than equally.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::corpus::{AuthorId, DocumentId};
use crate::counts::table::{CountTable, FeatureCounts};

use super::exclusion::{ExcludedSubject, Exclusion};
use super::frequency::FrequencyProfile;

/// The aggregate fingerprint of one known author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub author: AuthorId,
    /// Documents merged into this profile, sorted.
    pub documents: Vec<DocumentId>,
    /// Merged raw counts, kept for common-word selection and auditing.
    pub counts: FeatureCounts,
    pub profile: FrequencyProfile,
}

/// Author profiles plus everything that had to be left out.
#[derive(Debug, Clone, Default)]
pub struct AuthorProfiles {
    pub profiles: Vec<AuthorProfile>,
    pub exclusions: Vec<Exclusion>,
}

/// Build one profile per author from document counts.
///
/// `assignments` maps each known document to its author. Documents with no
/// words are reported as exclusions; an author left with no words at all is
/// excluded as a whole. A document listed more than once for the same author
/// is merged once. Profiles come back sorted by author.
pub fn build_author_profiles(
    assignments: &[(DocumentId, AuthorId)],
    counts: &CountTable,
) -> AuthorProfiles {
    let mut grouped: BTreeMap<&AuthorId, (Vec<DocumentId>, FeatureCounts)> = BTreeMap::new();
    let mut seen: BTreeSet<(&AuthorId, &DocumentId)> = BTreeSet::new();
    let mut exclusions = Vec::new();

    for (document, author) in assignments {
        if !seen.insert((author, document)) {
            debug!(author = %author, document = %document, "Skipping repeated assignment");
            continue;
        }
        let entry = grouped.entry(author).or_default();
        match counts.get(document) {
            Some(doc_counts) if doc_counts.word_count() > 0 => {
                entry.1.merge(doc_counts);
                entry.0.push(document.clone());
            }
            _ => exclusions.push(Exclusion::no_words(ExcludedSubject::KnownDocument {
                author: author.clone(),
                document: document.clone(),
            })),
        }
    }

    let mut profiles = Vec::new();
    for (author, (mut documents, merged)) in grouped {
        match FrequencyProfile::from_counts(&merged) {
            Ok(profile) => {
                documents.sort();
                debug!(
                    author = %author,
                    documents = documents.len(),
                    words = profile.word_count,
                    "Built author profile"
                );
                profiles.push(AuthorProfile {
                    author: author.clone(),
                    documents,
                    counts: merged,
                    profile,
                });
            }
            Err(reason) => {
                warn!(author = %author, "Author has no words, excluded from ranking");
                exclusions.push(Exclusion {
                    subject: ExcludedSubject::Author {
                        author: author.clone(),
                    },
                    reason,
                });
            }
        }
    }

    AuthorProfiles {
        profiles,
        exclusions,
    }
}
