// Quillmark: stylometric authorship attribution
//
// This is the library root. Each module corresponds to one stage of the
// attribution pipeline, from raw text to ranked candidate authors.

pub mod config;
pub mod corpus;
pub mod counts;
pub mod features;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod ranking;
