// Output formatting: terminal display and report generation.

use crate::features::category::Category;

pub mod markdown;
pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..40]`), this respects UTF-8 character boundaries
/// and will never panic on accented letters in document or author names.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Short label for a category column. Common words show as the quoted word.
pub fn category_label(category: &Category) -> String {
    match category {
        Category::CommonWord(word) => format!("\"{word}\""),
        other => other.name(),
    }
}
