// Feature extraction: tokenizing lines and classifying tokens into
// stylometric categories.

pub mod category;
pub mod classifier;
pub mod extract;
pub mod language;
pub mod tokenizer;
