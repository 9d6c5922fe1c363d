use rayon::prelude::*;

use super::alignment::Alignment;
use super::nw::{encode_query, global_align_with_buf, NwBuffer};
use super::seed::{find_seeds, Seed};
use super::ungapped::extend_ungapped;
use super::SearchOpt;
use crate::error::{PblastError, Result};
use crate::index::KmerIndex;
use crate::model::{ProbSequence, ScoringScheme};
use crate::util::dna;

/// 种子-延伸搜索引擎：索引查找 -> 无间隙延伸 -> 全局比对 -> 显著性过滤。
///
/// 基因组与索引只读共享；`threads > 1` 时各候选偏移在 rayon 线程池中独立评估，
/// 结果仍按偏移的发现顺序返回。
pub struct Searcher<'a> {
    genome: &'a ProbSequence,
    index: &'a KmerIndex,
    scheme: ScoringScheme,
    opt: SearchOpt,
    pool: Option<rayon::ThreadPool>,
}

impl<'a> Searcher<'a> {
    pub fn new(genome: &'a ProbSequence, index: &'a KmerIndex, opt: SearchOpt) -> Result<Self> {
        if opt.word_len != index.word_len() {
            return Err(PblastError::InvalidInput(format!(
                "word length {} does not match index word length {}",
                opt.word_len,
                index.word_len()
            )));
        }
        let scheme = genome.scheme().ok_or(PblastError::MissingScheme)?;
        let pool = if opt.threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(opt.threads)
                .build()
                .map_err(|e| PblastError::InvalidInput(format!("cannot build thread pool: {}", e)))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self { genome, index, scheme, opt, pool })
    }

    pub fn search(&self, query: &[u8]) -> Result<Vec<Alignment>> {
        let query = dna::normalize_seq(query);
        let alpha = encode_query(&query)?;
        let seeds = find_seeds(&query, self.index);

        let eval = |seed: &Seed, buf: &mut NwBuffer| self.evaluate(&query, &alpha, seed, buf);
        let results: Vec<Option<Alignment>> = match &self.pool {
            Some(pool) if seeds.len() > 1 => pool.install(|| {
                seeds
                    .par_iter()
                    .map_init(NwBuffer::new, |buf, seed| eval(seed, buf))
                    .collect::<Result<Vec<_>>>()
            })?,
            _ => {
                let mut buf = NwBuffer::new();
                seeds.iter().map(|seed| eval(seed, &mut buf)).collect::<Result<Vec<_>>>()?
            }
        };

        let alignments: Vec<Alignment> = results.into_iter().flatten().collect();
        log::debug!(
            "query_len={} seeds={} reported={}",
            query.len(),
            seeds.len(),
            alignments.len()
        );
        Ok(alignments)
    }

    /// 评估单个候选偏移；未通过任一阶段的 E 值过滤时返回 `None`
    fn evaluate(&self, query: &[u8], alpha: &[u8], seed: &Seed, buf: &mut NwBuffer) -> Result<Option<Alignment>> {
        let m = self.genome.len();
        let n = query.len();
        let threshold = self.opt.threshold;

        let hit = extend_ungapped(alpha, self.genome, self.scheme, seed.q_pos, seed.g_pos, self.opt.x_drop);
        let provisional = self.opt.karlin.evalue(hit.score, m, n);
        if provisional >= threshold {
            log::trace!(
                "offset {}: ungapped score {:.3} (E={:.3e}) below significance",
                seed.offset,
                hit.score,
                provisional
            );
            return Ok(None);
        }
        log::trace!(
            "offset {}: HSP q[{}..{}) g@{} score {:.3} (E={:.3e})",
            seed.offset,
            hit.q_begin,
            hit.q_end,
            hit.g_begin,
            hit.score,
            provisional
        );

        let window = self.genome.sub_window(seed.offset, seed.offset + n as isize);
        let nw = global_align_with_buf(query, &window, buf)?;
        let evalue = self.opt.karlin.evalue(nw.score, m, n);
        if evalue >= threshold {
            log::trace!("offset {}: gapped score {:.3} (E={:.3e}) rejected", seed.offset, nw.score, evalue);
            return Ok(None);
        }
        log::trace!("offset {}: reported, score {:.3} E={:.3e}", seed.offset, nw.score, evalue);
        let bits = self.opt.karlin.bit_score(nw.score);
        Ok(Some(Alignment::from_nw(nw, seed.offset, evalue, bits)))
    }
}

/// 单次搜索的便捷入口
pub fn search(query: &[u8], genome: &ProbSequence, index: &KmerIndex, opt: &SearchOpt) -> Result<Vec<Alignment>> {
    Searcher::new(genome, index, opt.clone())?.search(query)
}
