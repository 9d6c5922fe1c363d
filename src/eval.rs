//! 批量评估：在基因组上随机截取查询、引入插入/删除后搜索，统计灵敏度与假阳性率。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::align::{Alignment, SearchOpt, Searcher};
use crate::error::{PblastError, Result};
use crate::index::KmerIndex;
use crate::model::{generate_query, ProbSequence};

#[derive(Clone, Debug)]
pub struct EvalOpt {
    pub query_len: usize,
    pub trials: usize,
    /// 插入与删除共用的概率
    pub gap_prob: f64,
    pub seed: u64,
    /// `threads` 用于并行执行各次试验
    pub search: SearchOpt,
}

impl Default for EvalOpt {
    fn default() -> Self {
        Self {
            query_len: 50,
            trials: 100,
            gap_prob: 0.07,
            seed: 1,
            search: SearchOpt::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvalReport {
    pub trials: usize,
    /// 至少有一个比对落在真实起点容差内的试验数
    pub true_positives: usize,
    /// 落在容差以外的比对总数
    pub false_positives: usize,
    pub sensitivity: f64,
    pub false_positive_rate: f64,
}

struct Trial {
    start: usize,
    query: Vec<u8>,
}

pub fn evaluate(genome: &ProbSequence, opt: &EvalOpt) -> Result<EvalReport> {
    if opt.trials == 0 {
        return Err(PblastError::InvalidInput("number of trials must be positive".to_string()));
    }
    if genome.len() <= opt.query_len {
        return Err(PblastError::InvalidInput(format!(
            "query length {} must be shorter than genome length {}",
            opt.query_len,
            genome.len()
        )));
    }

    let index = KmerIndex::build(genome, opt.search.word_len)?;
    let searcher = Searcher::new(genome, &index, SearchOpt { threads: 1, ..opt.search.clone() })?;

    // 查询全部由同一个随机源顺序生成，保证并行与否结果一致
    let mut rng = StdRng::seed_from_u64(opt.seed);
    let max_start = genome.len() - opt.query_len;
    let mut trials = Vec::with_capacity(opt.trials);
    for _ in 0..opt.trials {
        let start = rng.random_range(0..max_start);
        let query = generate_query(genome, start, opt.query_len, opt.gap_prob, opt.gap_prob, &mut rng)?;
        trials.push(Trial { start, query });
    }

    let tolerance = opt.query_len as f64 * opt.gap_prob;
    let run = |t: &Trial| -> Result<(bool, usize)> {
        let hits = searcher.search(&t.query)?;
        Ok(score_trial(&hits, t.start, tolerance))
    };

    let outcomes: Vec<(bool, usize)> = if opt.search.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opt.search.threads)
            .build()
            .map_err(|e| PblastError::InvalidInput(format!("cannot build thread pool: {}", e)))?;
        pool.install(|| trials.par_iter().map(run).collect::<Result<Vec<_>>>())?
    } else {
        trials.iter().map(run).collect::<Result<Vec<_>>>()?
    };

    let true_positives = outcomes.iter().filter(|(hit, _)| *hit).count();
    let false_positives: usize = outcomes.iter().map(|(_, fp)| fp).sum();
    let n = opt.trials as f64;
    let report = EvalReport {
        trials: opt.trials,
        true_positives,
        false_positives,
        sensitivity: true_positives as f64 / n,
        false_positive_rate: false_positives as f64 / n,
    };
    log::info!(
        "evaluated {} trials: sensitivity={:.3} false_positive_rate={:.3}",
        report.trials,
        report.sensitivity,
        report.false_positive_rate
    );
    Ok(report)
}

/// 返回（是否命中真实位置，容差外的比对数）
fn score_trial(hits: &[Alignment], start: usize, tolerance: f64) -> (bool, usize) {
    let lo = start as f64 - tolerance;
    let hi = start as f64 + tolerance;
    let mut found = false;
    let mut false_pos = 0;
    for aln in hits {
        let off = aln.offset as f64;
        if off >= lo && off <= hi {
            found = true;
        } else {
            false_pos += 1;
        }
    }
    (found, false_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScoringScheme;
    use crate::util::dna;

    fn random_genome(len: usize, seed: u64) -> ProbSequence {
        let mut rng = StdRng::seed_from_u64(seed);
        let symbols: Vec<u8> = (0..len).map(|_| dna::from_index(rng.random_range(0..4))).collect();
        let probs: Vec<f64> = (0..len).map(|_| rng.random_range(0.99..1.0)).collect();
        ProbSequence::from_confidences(&symbols, &probs, ScoringScheme::Linear).unwrap()
    }

    fn eval_opt(gap_prob: f64, threads: usize) -> EvalOpt {
        EvalOpt {
            query_len: 50,
            trials: 20,
            gap_prob,
            seed: 3,
            search: SearchOpt { threads, ..SearchOpt::default() },
        }
    }

    #[test]
    fn no_indels_recovers_every_offset() {
        let g = random_genome(3000, 21);
        let report = evaluate(&g, &eval_opt(0.0, 1)).unwrap();
        assert_eq!(report.trials, 20);
        assert_eq!(report.true_positives, 20);
        assert_eq!(report.sensitivity, 1.0);
    }

    #[test]
    fn deterministic_and_thread_independent() {
        let g = random_genome(3000, 4);
        let a = evaluate(&g, &eval_opt(0.05, 1)).unwrap();
        let b = evaluate(&g, &eval_opt(0.05, 1)).unwrap();
        let c = evaluate(&g, &eval_opt(0.05, 3)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn tolerance_window_classifies_hits() {
        let w = ProbSequence::from_confidences(b"ACGT", &[0.9; 4], ScoringScheme::Linear).unwrap();
        let nw = crate::align::global_align(b"ACGT", &w).unwrap();
        let at = |offset| Alignment::from_nw(nw.clone(), offset, 0.1, 0.0);
        let hits = vec![at(97), at(103), at(104), at(-5)];
        assert_eq!(score_trial(&hits, 100, 3.5), (true, 2));
        assert_eq!(score_trial(&hits[2..], 100, 3.5), (false, 2));
    }

    #[test]
    fn rejects_bad_options() {
        let g = random_genome(40, 1);
        assert!(matches!(evaluate(&g, &eval_opt(0.0, 1)), Err(PblastError::InvalidInput(_))));
        let mut opt = eval_opt(0.0, 1);
        opt.query_len = 10;
        opt.trials = 0;
        assert!(matches!(evaluate(&g, &opt), Err(PblastError::InvalidInput(_))));
    }
}
