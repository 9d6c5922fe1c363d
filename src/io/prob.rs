use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{PblastError, Result};
use crate::model::{ProbSequence, ScoringScheme};
use crate::util::dna;

/// 从符号文件与置信度文件加载概率基因组。
///
/// 两个文件都只读第一行：符号串，以及每个符号对应的置信度（空白分隔）。
/// 任一来源出错都直接返回错误。
pub fn load_prob_sequence<P: AsRef<Path>, Q: AsRef<Path>>(
    seq_path: P,
    prob_path: Q,
    scheme: ScoringScheme,
) -> Result<ProbSequence> {
    let seq_path = seq_path.as_ref();
    let prob_path = prob_path.as_ref();
    log::info!("loading genome from {} / {}", seq_path.display(), prob_path.display());
    let seq = BufReader::new(File::open(seq_path)?);
    let probs = BufReader::new(File::open(prob_path)?);
    let genome = read_prob_sequence(seq, probs, scheme)?;
    log::info!("loaded {} positions (scheme {})", genome.len(), scheme);
    Ok(genome)
}

pub fn read_prob_sequence<S: BufRead, P: BufRead>(
    mut seq_reader: S,
    mut prob_reader: P,
    scheme: ScoringScheme,
) -> Result<ProbSequence> {
    let mut line = String::new();
    seq_reader.read_line(&mut line)?;
    let symbols = dna::normalize_seq(line.trim().as_bytes());
    if symbols.is_empty() {
        return Err(PblastError::EmptySource("sequence"));
    }

    line.clear();
    prob_reader.read_line(&mut line)?;
    let confidences = parse_confidences(&line)?;
    if confidences.is_empty() {
        return Err(PblastError::EmptySource("probability"));
    }

    ProbSequence::from_confidences(&symbols, &confidences, scheme)
}

fn parse_confidences(line: &str) -> Result<Vec<f64>> {
    line.split_whitespace()
        .enumerate()
        .map(|(i, tok)| {
            tok.parse::<f64>()
                .map_err(|e| PblastError::Parse(format!("probability #{} '{}': {}", i, tok, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::{Cursor, Write};

    fn read(seq: &str, probs: &str) -> Result<ProbSequence> {
        read_prob_sequence(Cursor::new(seq), Cursor::new(probs), ScoringScheme::Linear)
    }

    #[test]
    fn reads_aligned_sources() {
        let g = read("acgT\n", "0.9 0.8\t0.7  0.97\n").unwrap();
        assert_eq!(g.len(), 4);
        assert_eq!(g.consensus(), b"ACGT");
        assert_abs_diff_eq!(g.prob(3, 3), 0.97);
        assert_abs_diff_eq!(g.prob(0, 3), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn only_first_line_is_used() {
        let g = read("ACGT\nTTTTTT\n", "0.9 0.9 0.9 0.9\n0.1\n").unwrap();
        assert_eq!(g.len(), 4);
    }

    #[test]
    fn empty_sources_fail() {
        assert!(matches!(read("", "0.9"), Err(PblastError::EmptySource("sequence"))));
        assert!(matches!(read("ACGT\n", "\n"), Err(PblastError::EmptySource("probability"))));
    }

    #[test]
    fn malformed_sources_fail() {
        assert!(matches!(read("ACGT", "0.9 0.9 0.9"), Err(PblastError::LengthMismatch { .. })));
        assert!(matches!(read("ACGT", "0.9 0.9 x 0.9"), Err(PblastError::Parse(_))));
        assert!(matches!(read("ACGT", "0.9 0.9 0.9 -0.1"), Err(PblastError::InvalidProbability { pos: 3, .. })));
        assert!(matches!(read("ACNT", "0.9 0.9 0.9 0.9"), Err(PblastError::InvalidSymbol { pos: 2, .. })));
    }

    #[test]
    fn loads_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let seq_path = dir.path().join("genome.txt");
        let prob_path = dir.path().join("genome_prob.txt");
        writeln!(File::create(&seq_path).unwrap(), "GATTACA").unwrap();
        writeln!(File::create(&prob_path).unwrap(), "0.9 0.8 0.7 0.6 0.9 0.8 0.7").unwrap();

        let g = load_prob_sequence(&seq_path, &prob_path, ScoringScheme::Pow15).unwrap();
        assert_eq!(g.consensus(), b"GATTACA");
        assert_eq!(g.scheme(), Some(ScoringScheme::Pow15));

        let missing = dir.path().join("nope.txt");
        assert!(matches!(
            load_prob_sequence(&missing, &prob_path, ScoringScheme::Linear),
            Err(PblastError::Io(_))
        ));
    }
}
