// Markdown report: the human-readable record of an attribution run.
//
// Sections: run parameters, one ranking table per unknown document,
// exclusions, then the full known-author profile table for auditing.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::features::category::Category;
use crate::features::language::LanguageSelector;
use crate::pipeline::attribution::AttributionReport;
use crate::profile::frequency::fixed_dimensions;

use super::category_label;

/// Escape characters that would break a markdown table cell.
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn describe_language(selector: &LanguageSelector) -> String {
    match selector {
        LanguageSelector::Fixed(language) => language.clone(),
        LanguageSelector::Telltale {
            candidates,
            fallback,
        } => format!("auto ({} else {fallback})", candidates.join(", ")),
    }
}

/// Render the report as markdown.
pub fn render_report(report: &AttributionReport) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# Authorship Attribution Report\n");
    let _ = writeln!(
        md,
        "Generated: {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(md, "- Language: {}", describe_language(&report.language));
    let _ = writeln!(md, "- Spread statistic: {}", report.options.spread);
    let common_cap = report
        .options
        .max_common_words
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unlimited".to_string());
    let _ = writeln!(md, "- Common-word features: {common_cap}");
    let _ = writeln!(md, "- Ranking features: {}", report.statistics.len());
    let _ = writeln!(md, "- Known authors: {}", report.authors.len());
    let _ = writeln!(md, "- Ranked documents: {}\n", report.rankings.len());

    // Rankings
    let _ = writeln!(md, "## Rankings\n");
    if report.rankings.is_empty() {
        let _ = writeln!(md, "No unknown documents could be ranked.\n");
    }
    for ranking in &report.rankings {
        let _ = writeln!(
            md,
            "### {} ({} words)\n",
            escape_cell(ranking.document.as_str()),
            ranking.word_count
        );
        let _ = writeln!(md, "| Rank | Author | Delta |");
        let _ = writeln!(md, "|------|--------|-------|");
        for (i, entry) in ranking.entries.iter().enumerate() {
            let _ = writeln!(
                md,
                "| {} | {} | {:.4} |",
                i + 1,
                escape_cell(entry.author.as_str()),
                entry.score
            );
        }
        if let Some(best) = ranking.best() {
            let verdict = if ranking.is_unique_best() {
                "Best match"
            } else {
                "Best match (tied)"
            };
            let _ = writeln!(md, "\n{verdict}: **{}**\n", escape_cell(best.author.as_str()));
        }
    }

    // Exclusions
    if !report.exclusions.is_empty() {
        let _ = writeln!(md, "## Excluded\n");
        for exclusion in &report.exclusions {
            let _ = writeln!(md, "- {}", escape_cell(&exclusion.to_string()));
        }
        let _ = writeln!(md);
    }

    // Known-author profiles
    let _ = writeln!(md, "## Known Author Profiles\n");
    let columns: Vec<Category> = fixed_dimensions().into_iter().collect();
    let _ = write!(md, "| Author | Documents | Words |");
    for column in &columns {
        let _ = write!(md, " {} |", category_label(column));
    }
    let _ = writeln!(md);
    let _ = write!(md, "|--------|-----------|-------|");
    for _ in &columns {
        let _ = write!(md, "------|");
    }
    let _ = writeln!(md);
    for author in &report.authors {
        let _ = write!(
            md,
            "| {} | {} | {} |",
            escape_cell(author.author.as_str()),
            author.documents.len(),
            author.profile.word_count
        );
        for column in &columns {
            let _ = write!(md, " {:.4} |", author.profile.ratio(column).unwrap_or(0.0));
        }
        let _ = writeln!(md);
    }
    let _ = writeln!(md);

    // Common-word features: every ranking feature outside the fixed set
    let common: Vec<&Category> = report
        .statistics
        .features
        .keys()
        .filter(|c| c.is_common_word())
        .collect();
    if !common.is_empty() {
        let _ = writeln!(md, "### Common-word frequencies\n");
        let _ = write!(md, "| Word | Mean | Spread |");
        for author in &report.authors {
            let _ = write!(md, " {} |", escape_cell(author.author.as_str()));
        }
        let _ = writeln!(md);
        let _ = write!(md, "|------|------|--------|");
        for _ in &report.authors {
            let _ = write!(md, "------|");
        }
        let _ = writeln!(md);
        for category in common {
            let Some(stat) = report.statistics.get(category) else {
                continue;
            };
            let _ = write!(
                md,
                "| {} | {:.5} | {:.5} |",
                escape_cell(&category_label(category)),
                stat.mean,
                stat.spread
            );
            for author in &report.authors {
                let _ = write!(md, " {:.5} |", author.profile.ratio(category).unwrap_or(0.0));
            }
            let _ = writeln!(md);
        }
        let _ = writeln!(md);
    }

    md
}

/// Write the markdown report to `path`, returning the path written.
pub fn generate_report(report: &AttributionReport, path: &Path) -> Result<String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
    }
    std::fs::write(path, render_report(report))
        .with_context(|| format!("writing report to {}", path.display()))?;
    Ok(path.display().to_string())
}
