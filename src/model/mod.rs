pub mod generate;
pub mod scoring;
pub mod sequence;

pub use generate::generate_query;
pub use scoring::ScoringScheme;
pub use sequence::{Column, ProbSequence, GAP_COLUMN};
