// Tokenizer: word tokens and punctuation marks from a single line.
//
// A token is a maximal run of word characters (letters, digits, underscore).
// An apostrophe joins two runs when it sits between word characters, so
// "don't" and the elided Italian "l'uomo" stay whole. Everything else is a
// separator and is dropped.
//
// Punctuation is not derived from the token stream: sentence terminators and
// comma-class marks are found by independent pattern scans over the raw line.

use regex_lite::Regex;

/// Default sentence-terminator pattern: `.`, `!` or `?` right after a
/// lowercase letter.
pub const TERMINATOR_PATTERN: &str = "[a-z][.!?]";

/// Default comma-class pattern.
pub const COMMA_PATTERN: &str = "[,!?]";

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Split a line into word tokens.
///
/// The returned iterator is lazy and `Clone`, so a caller can restart the
/// scan from the beginning without re-reading the line.
pub fn tokens(line: &str) -> Tokens<'_> {
    Tokens { line, pos: 0 }
}

/// Lazy iterator over the word tokens of one line.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = &self.line[self.pos..];
        let start_offset = rest.find(is_word_char)?;
        let start = self.pos + start_offset;

        let mut end = start;
        let mut chars = self.line[start..].char_indices().peekable();
        while let Some((offset, c)) = chars.next() {
            if is_word_char(c) {
                end = start + offset + c.len_utf8();
            } else if is_apostrophe(c) && chars.peek().is_some_and(|&(_, n)| is_word_char(n)) {
                // joined: the following word character extends the token
                continue;
            } else {
                break;
            }
        }

        self.pos = end;
        Some(&self.line[start..end])
    }
}

/// Compiled punctuation scanners.
///
/// Each scan counts non-overlapping matches of its pattern in the raw line.
#[derive(Debug, Clone)]
pub struct PunctuationPatterns {
    terminator: Regex,
    comma: Regex,
}

impl PunctuationPatterns {
    /// Compile custom terminator and comma-class patterns.
    pub fn new(terminator: &str, comma: &str) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            terminator: Regex::new(terminator)?,
            comma: Regex::new(comma)?,
        })
    }

    /// The standard patterns ([`TERMINATOR_PATTERN`], [`COMMA_PATTERN`]).
    pub fn standard() -> Result<Self, regex_lite::Error> {
        Self::new(TERMINATOR_PATTERN, COMMA_PATTERN)
    }

    pub fn count_terminators(&self, line: &str) -> u64 {
        self.terminator.find_iter(line).count() as u64
    }

    pub fn count_commas(&self, line: &str) -> u64 {
        self.comma.find_iter(line).count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_split_on_boundaries() {
        let toks: Vec<&str> = tokens("Call me Ishmael. Some years ago--never mind").collect();
        assert_eq!(
            toks,
            vec!["Call", "me", "Ishmael", "Some", "years", "ago", "never", "mind"]
        );
    }

    #[test]
    fn test_tokens_keep_inner_apostrophe() {
        let toks: Vec<&str> = tokens("I don't know l'uomo 'quoted' dogs'").collect();
        assert_eq!(toks, vec!["I", "don't", "know", "l'uomo", "quoted", "dogs"]);
    }

    #[test]
    fn test_tokens_unicode_letters() {
        let toks: Vec<&str> = tokens("né però, perché!").collect();
        assert_eq!(toks, vec!["né", "però", "perché"]);
    }

    #[test]
    fn test_tokens_empty_and_punctuation_only() {
        assert_eq!(tokens("").count(), 0);
        assert_eq!(tokens("   \t ").count(), 0);
        assert_eq!(tokens("... !? ,,").count(), 0);
    }

    #[test]
    fn test_tokens_restartable() {
        let iter = tokens("one two three");
        let first: Vec<&str> = iter.clone().collect();
        let second: Vec<&str> = iter.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_terminators_need_lowercase_before() {
        let p = PunctuationPatterns::standard().unwrap();
        // "end." and "why?" count; "USA." and "3." do not
        assert_eq!(p.count_terminators("The end. Why? USA. Item 3."), 2);
    }

    #[test]
    fn test_comma_class_includes_bang_and_question() {
        let p = PunctuationPatterns::standard().unwrap();
        assert_eq!(p.count_commas("Well, well! Really? Yes."), 3);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(PunctuationPatterns::new("[a-z", COMMA_PATTERN).is_err());
    }
}
