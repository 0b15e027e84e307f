// Similarity ranking: corpus statistics, Delta distance and author ranking.

pub mod delta;
pub mod rank;
pub mod stats;
