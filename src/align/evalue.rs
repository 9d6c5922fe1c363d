use serde::{Deserialize, Serialize};

/// Karlin-Altschul 统计参数，取决于打分方案，由调用方给定
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KarlinParams {
    pub k: f64,
    pub lambda: f64,
}

impl Default for KarlinParams {
    fn default() -> Self {
        Self { k: 1.0, lambda: 1.0 }
    }
}

impl KarlinParams {
    pub fn new(k: f64, lambda: f64) -> Self {
        Self { k, lambda }
    }

    /// E = K * m * n * exp(-lambda * s)
    ///
    /// `m` 为基因组长度，`n` 为查询长度，`s` 为无间隙片段得分或 DP 最优得分。
    #[inline]
    pub fn evalue(&self, score: f64, genome_len: usize, query_len: usize) -> f64 {
        self.k * genome_len as f64 * query_len as f64 * (-self.lambda * score).exp()
    }

    /// S' = (lambda * S - ln K) / ln 2
    pub fn bit_score(&self, score: f64) -> f64 {
        (self.lambda * score - self.k.ln()) / std::f64::consts::LN_2
    }
}
