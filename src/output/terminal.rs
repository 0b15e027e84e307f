// Colored terminal output for rankings and author profiles.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here.

use colored::Colorize;

use crate::counts::table::CountTable;
use crate::features::language::LanguageRegistry;
use crate::pipeline::attribution::AttributionReport;
use crate::profile::exclusion::Exclusion;
use crate::profile::frequency::fixed_dimensions;

use super::{category_label, truncate_chars};

/// Display every unknown document's ranking, best match first.
pub fn display_rankings(report: &AttributionReport) {
    if report.rankings.is_empty() {
        println!("No unknown documents could be ranked.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Attribution ({} documents, {} authors, spread: {}) ===",
            report.rankings.len(),
            report.authors.len(),
            report.options.spread
        )
        .bold()
    );

    for ranking in &report.rankings {
        println!();
        println!(
            "  {} {}",
            truncate_chars(ranking.document.as_str(), 60).bold(),
            format!("({} words)", ranking.word_count).dimmed()
        );

        for (i, entry) in ranking.entries.iter().enumerate() {
            let line = format!(
                "    {:>3}. {:<32} {:>9.3}",
                i + 1,
                truncate_chars(entry.author.as_str(), 30),
                entry.score
            );
            if i == 0 && ranking.is_unique_best() {
                println!("{}", line.bright_green().bold());
            } else if i == 0 {
                println!("{}  {}", line.yellow(), "(tie)".yellow());
            } else {
                println!("{line}");
            }
        }
    }
    println!();
}

/// Display inputs that were left out of ranking.
pub fn display_exclusions(exclusions: &[Exclusion]) {
    if exclusions.is_empty() {
        return;
    }
    println!(
        "{}",
        format!("=== Excluded ({}) ===", exclusions.len()).bold()
    );
    for exclusion in exclusions {
        println!("  {} {}", "!".bright_red(), exclusion);
    }
    println!();
}

/// Display the known-author profile table: fixed dimensions, then each
/// author's most frequent common words.
pub fn display_author_profiles(report: &AttributionReport, top_words: usize) {
    if report.authors.is_empty() {
        return;
    }
    println!("{}", "=== Known Author Profiles ===".bold());

    let dims = fixed_dimensions();
    let mut header = format!("  {:<24} {:>8}", "Author", "Words");
    for dim in &dims {
        header.push_str(&format!(" {:>12}", category_label(dim)));
    }
    println!("{}", header.dimmed());
    println!("  {}", "-".repeat(header.len().saturating_sub(2)).dimmed());

    for author in &report.authors {
        let mut row = format!(
            "  {:<24} {:>8}",
            truncate_chars(author.author.as_str(), 22),
            author.profile.word_count
        );
        for dim in &dims {
            let ratio = author.profile.ratio(dim).unwrap_or(0.0);
            row.push_str(&format!(" {:>12.4}", ratio));
        }
        println!("{row}");

        let top = author.profile.top_common_words(top_words);
        if !top.is_empty() {
            let words: Vec<String> = top
                .iter()
                .map(|(word, ratio)| format!("{word} {ratio:.4}"))
                .collect();
            println!("      Top words: {}", words.join(", ").dimmed());
        }
    }
    println!();
}

/// Display a summary of extracted count tables.
pub fn display_count_summary(table: &CountTable) {
    println!(
        "\n{}",
        format!("=== Feature Counts ({} documents) ===", table.len()).bold()
    );
    for (document, counts) in table.iter() {
        let status = if counts.word_count() == 0 {
            "no words".red().to_string()
        } else {
            format!("{} words", counts.word_count())
        };
        println!(
            "  {:<48} {:>14}  {} categories",
            truncate_chars(document.as_str(), 46),
            status,
            counts.len()
        );
    }
    println!();
}

/// Display the configured languages and their table sizes.
pub fn display_languages(registry: &LanguageRegistry) {
    println!("\n{}", "=== Configured Languages ===".bold());
    println!(
        "  {:<8} {:>8} {:>8} {:>8} {:>8} {:>8}  {}",
        "Id".dimmed(),
        "Art".dimmed(),
        "Conj".dimmed(),
        "Prep".dimmed(),
        "Pron".dimmed(),
        "Verb".dimmed(),
        "Telltales".dimmed()
    );
    for (id, tables) in registry.languages() {
        println!(
            "  {:<8} {:>8} {:>8} {:>8} {:>8} {:>8}  {}",
            id.bold(),
            tables.articles.len(),
            tables.conjunctions.len(),
            tables.prepositions.len(),
            tables.pronouns.len(),
            tables.verbs.len(),
            tables.telltales.len()
        );
    }
    println!();
}
