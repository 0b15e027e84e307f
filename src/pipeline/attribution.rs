// Attribution pipeline: from a corpus to ranked best matches.
//
// Steps:
// 1. Extract feature counts for known and unknown documents (in parallel)
// 2. Merge each author's documents and build author profiles
// 3. Compute corpus statistics and standardize every author
// 4. Profile each unknown document and rank the authors against it
//
// Steps 2-4 also run on their own from already-aggregated count tables, so
// counts produced elsewhere (or read back from the count artifact) can be
// ranked without re-reading the text.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::corpus::{AuthorId, Corpus, DocumentId};
use crate::counts::table::CountTable;
use crate::features::extract::FeatureExtractor;
use crate::features::language::LanguageSelector;
use crate::profile::author::{build_author_profiles, AuthorProfile};
use crate::profile::exclusion::{ExcludedSubject, Exclusion};
use crate::profile::frequency::{FrequencyProfile, ProfileError};
use crate::ranking::rank::{DeltaEngine, DeltaOptions, Ranking};
use crate::ranking::stats::CorpusStatistics;

/// The terminal artifact of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionReport {
    pub generated_at: DateTime<Utc>,
    pub language: LanguageSelector,
    pub options: DeltaOptions,
    /// Known author profiles, sorted by author.
    pub authors: Vec<AuthorProfile>,
    pub statistics: CorpusStatistics,
    /// One ranking per profiled unknown document, sorted by document.
    pub rankings: Vec<Ranking>,
    /// Inputs that had no profile and were left out.
    pub exclusions: Vec<Exclusion>,
}

impl AttributionReport {
    pub fn ranking(&self, document: &DocumentId) -> Option<&Ranking> {
        self.rankings.iter().find(|r| &r.document == document)
    }

    /// Delta between an unknown document and an author.
    pub fn delta(&self, document: &DocumentId, author: &AuthorId) -> Option<f64> {
        self.ranking(document).and_then(|r| r.score_for(author))
    }

    pub fn is_excluded(&self, document: &DocumentId) -> bool {
        self.exclusions.iter().any(|e| match &e.subject {
            ExcludedSubject::UnknownDocument { document: d } => d == document,
            ExcludedSubject::KnownDocument { document: d, .. } => d == document,
            ExcludedSubject::Author { .. } => false,
        })
    }
}

/// A finished run: the report plus the raw count tables behind it.
#[derive(Debug, Clone)]
pub struct AttributionRun {
    pub report: AttributionReport,
    pub known_counts: CountTable,
    pub unknown_counts: CountTable,
}

/// Run the whole pipeline over a corpus.
pub fn run(
    corpus: &Corpus,
    extractor: &FeatureExtractor,
    options: &DeltaOptions,
    show_progress: bool,
) -> Result<AttributionRun> {
    let known_docs: Vec<(&DocumentId, &str)> = corpus
        .known
        .iter()
        .map(|d| (&d.id, d.text.as_str()))
        .collect();
    let unknown_docs: Vec<(&DocumentId, &str)> = corpus
        .unknown
        .iter()
        .map(|d| (&d.id, d.text.as_str()))
        .collect();

    let known_counts =
        super::extraction::extract_counts(extractor, &known_docs, "Known", show_progress);
    let unknown_counts =
        super::extraction::extract_counts(extractor, &unknown_docs, "Unknown", show_progress);

    let assignments: Vec<(DocumentId, AuthorId)> = corpus
        .known
        .iter()
        .map(|d| (d.id.clone(), d.author.clone()))
        .collect();
    let unknown_ids: Vec<DocumentId> = corpus.unknown.iter().map(|d| d.id.clone()).collect();

    let report = rank_counts(
        &assignments,
        &known_counts,
        &unknown_ids,
        &unknown_counts,
        extractor.selector().clone(),
        options,
    )?;

    Ok(AttributionRun {
        report,
        known_counts,
        unknown_counts,
    })
}

/// Profile and rank from finalized count tables.
///
/// Fails only when no known author has a profile, since there is nothing
/// to rank against. Every other missing profile becomes an exclusion.
pub fn rank_counts(
    assignments: &[(DocumentId, AuthorId)],
    known_counts: &CountTable,
    unknown_ids: &[DocumentId],
    unknown_counts: &CountTable,
    language: LanguageSelector,
    options: &DeltaOptions,
) -> Result<AttributionReport> {
    let built = build_author_profiles(assignments, known_counts);
    let mut exclusions = built.exclusions;
    let authors = built.profiles;

    if authors.is_empty() {
        anyhow::bail!(
            "No known author has any words ({} known documents), nothing to rank against",
            assignments.len()
        );
    }
    if authors.len() == 1 {
        warn!(
            author = %authors[0].author,
            "Only one known author; every feature is constant and all distances are zero"
        );
    }
    info!(authors = authors.len(), "Built author profiles");

    let engine = DeltaEngine::new(&authors, options);

    let mut ids: Vec<&DocumentId> = unknown_ids.iter().collect();
    ids.sort();
    ids.dedup();

    let mut rankings = Vec::new();
    for id in ids {
        let profile = unknown_counts
            .get(id)
            .ok_or(ProfileError::DivisionUndefined)
            .and_then(FrequencyProfile::from_counts);
        match profile {
            Ok(profile) => {
                let ranking = engine.rank(id.clone(), &profile);
                if let Some(best) = ranking.best() {
                    info!(
                        document = %id,
                        best = %best.author,
                        delta = format!("{:.3}", best.score),
                        "Ranked unknown document"
                    );
                }
                rankings.push(ranking);
            }
            Err(reason) => {
                warn!(document = %id, "Unknown document has no words, excluded from ranking");
                exclusions.push(Exclusion {
                    subject: ExcludedSubject::UnknownDocument {
                        document: id.clone(),
                    },
                    reason,
                });
            }
        }
    }

    // independent of the order assignments arrive in
    exclusions.sort_by(|a, b| a.subject.cmp(&b.subject));

    Ok(AttributionReport {
        generated_at: Utc::now(),
        language,
        options: *options,
        authors,
        statistics: engine.statistics().clone(),
        rankings,
        exclusions,
    })
}
