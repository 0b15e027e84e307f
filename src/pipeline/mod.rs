// Pipelines: parallel extraction and the end-to-end attribution run.

pub mod attribution;
pub mod extraction;
