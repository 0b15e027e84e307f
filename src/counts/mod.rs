// Count aggregation: per-document category tallies and their persisted form.

pub mod artifact;
pub mod table;
