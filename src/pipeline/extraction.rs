// Parallel feature extraction over a document group.
//
// Each rayon worker folds the documents it is handed into its own partial
// CountTable; partials are then reduced with the table merge. Since merge is
// commutative and associative, the split rayon picks does not change the
// result.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::info;

use crate::corpus::DocumentId;
use crate::counts::table::CountTable;
use crate::features::extract::FeatureExtractor;

/// Extract counts for every `(id, text)` pair in parallel.
pub fn extract_counts(
    extractor: &FeatureExtractor,
    documents: &[(&DocumentId, &str)],
    label: &str,
    show_progress: bool,
) -> CountTable {
    let pb = progress_bar(documents.len(), label, show_progress);

    let table = documents
        .par_iter()
        .fold(CountTable::new, |mut partial, (id, text)| {
            partial.insert((*id).clone(), extractor.extract(text));
            pb.inc(1);
            partial
        })
        .reduce(CountTable::new, CountTable::merged);

    pb.finish_and_clear();
    info!(group = label, documents = table.len(), "Extracted feature counts");
    table
}

/// Single-threaded equivalent of [`extract_counts`].
pub fn extract_counts_sequential(
    extractor: &FeatureExtractor,
    documents: &[(&DocumentId, &str)],
) -> CountTable {
    documents
        .iter()
        .fold(CountTable::new(), |mut table, (id, text)| {
            table.insert((*id).clone(), extractor.extract(text));
            table
        })
}

fn progress_bar(len: usize, label: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    let template = format!("  {label} [{{bar:30}}] {{pos}}/{{len}} ({{eta}})");
    if let Ok(style) = ProgressStyle::default_bar().template(&template) {
        pb.set_style(style);
    }
    pb
}
