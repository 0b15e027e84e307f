// Frequency profiles: normalized fingerprints for documents and authors.

pub mod author;
pub mod exclusion;
pub mod frequency;
