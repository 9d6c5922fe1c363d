pub mod fasta;
pub mod prob;

pub use fasta::{read_queries, QueryRecord};
pub use prob::{load_prob_sequence, read_prob_sequence};
