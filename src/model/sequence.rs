use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PblastError, Result};
use crate::model::scoring::ScoringScheme;
use crate::util::dna::{self, SIGMA};

/// 单个位置上四种碱基（A, C, G, T 顺序）的概率
pub type Column = [f64; SIGMA];

/// 间隙列：四种碱基概率均为 0
pub const GAP_COLUMN: Column = [0.0; SIGMA];

/// 概率序列：每个位置保存一列碱基概率分布。
///
/// - 列按位置顺序存放在双端队列中，回溯重建对齐时可在头部 O(1) 插入；
/// - 打分方案在构造时确定，子窗口继承同一方案；
/// - 搜索与打分阶段视为只读。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProbSequence {
    cols: VecDeque<Column>,
    scheme: Option<ScoringScheme>,
}

impl ProbSequence {
    /// 不带打分方案的空序列，用作对齐轨道的起点
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns(cols: Vec<Column>, scheme: Option<ScoringScheme>) -> Self {
        Self { cols: cols.into(), scheme }
    }

    /// 由“声明碱基 + 置信度”构建：声明碱基概率为 `p`，其余三种各为 `(1-p)/3`。
    pub fn from_confidences(symbols: &[u8], confidences: &[f64], scheme: ScoringScheme) -> Result<Self> {
        if symbols.is_empty() {
            return Err(PblastError::EmptySource("sequence"));
        }
        if confidences.is_empty() {
            return Err(PblastError::EmptySource("probability"));
        }
        if symbols.len() != confidences.len() {
            return Err(PblastError::LengthMismatch {
                symbols: symbols.len(),
                probabilities: confidences.len(),
            });
        }

        let mut cols = VecDeque::with_capacity(symbols.len());
        for (pos, (&sym, &p)) in symbols.iter().zip(confidences).enumerate() {
            let main = dna::to_index(sym).ok_or(PblastError::InvalidSymbol { pos, symbol: char::from(sym) })?;
            if !(0.0..=1.0).contains(&p) {
                return Err(PblastError::InvalidProbability { pos, value: p });
            }
            let other = (1.0 - p) / 3.0;
            let mut col = [other; SIGMA];
            col[main] = p;
            cols.push_back(col);
        }

        Ok(Self { cols, scheme: Some(scheme) })
    }

    pub fn with_scheme(mut self, scheme: ScoringScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    #[inline]
    pub fn scheme(&self) -> Option<ScoringScheme> {
        self.scheme
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    #[inline]
    pub fn column(&self, pos: usize) -> &Column {
        &self.cols[pos]
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.cols.iter()
    }

    /// 碱基 `base`（0..4 编码）在 `pos` 处的概率
    #[inline]
    pub fn prob(&self, base: usize, pos: usize) -> f64 {
        self.cols[pos][base]
    }

    /// 用给定方案为编码后的碱基打分，跳过方案与字符校验；供热循环使用
    #[inline]
    pub(crate) fn score_base(&self, scheme: ScoringScheme, base: usize, pos: usize) -> f64 {
        scheme.score(self.cols[pos][base])
    }

    /// 对 `pos` 处的 `symbol` 打分，结果在 [-1, 1]。
    pub fn score_char(&self, symbol: u8, pos: usize) -> Result<f64> {
        let scheme = self.scheme.ok_or(PblastError::MissingScheme)?;
        let base = dna::to_index(symbol).ok_or(PblastError::InvalidSymbol { pos, symbol: char::from(symbol) })?;
        Ok(self.score_base(scheme, base, pos))
    }

    /// 复制列区间 `[start, end)`；`start` 截断到 0，`end` 截断到序列长度。
    pub fn sub_window(&self, start: isize, end: isize) -> ProbSequence {
        let len = self.cols.len();
        let s = start.max(0) as usize;
        let e = if end < 0 { 0 } else { (end as usize).min(len) };
        let cols = if s < e { self.cols.range(s..e).copied().collect() } else { VecDeque::new() };
        ProbSequence { cols, scheme: self.scheme }
    }

    /// 概率最大的碱基；并列时取 ACGT 顺序中最靠前者
    pub fn consensus_symbol(&self, pos: usize) -> u8 {
        let col = &self.cols[pos];
        let mut best = 0usize;
        for b in 1..SIGMA {
            if col[b] > col[best] {
                best = b;
            }
        }
        dna::from_index(best)
    }

    pub fn consensus(&self) -> Vec<u8> {
        (0..self.len()).map(|i| self.consensus_symbol(i)).collect()
    }

    pub fn prepend_gap(&mut self) {
        self.cols.push_front(GAP_COLUMN);
    }

    pub fn prepend_copy(&mut self, source: &ProbSequence, index: usize) {
        self.cols.push_front(source.cols[index]);
    }
}

impl fmt::Display for ProbSequence {
    /// 每种碱基一行，按列输出概率
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (b, &base) in dna::BASES.iter().enumerate() {
            write!(f, "{}:", char::from(base))?;
            for col in &self.cols {
                write!(f, "\t{:.3}", col[b])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn seq(symbols: &[u8], p: f64) -> ProbSequence {
        let probs = vec![p; symbols.len()];
        ProbSequence::from_confidences(symbols, &probs, ScoringScheme::Linear).unwrap()
    }

    #[test]
    fn confidences_spread_remaining_mass() {
        let s = ProbSequence::from_confidences(b"ACGT", &[0.97, 0.4, 1.0, 0.25], ScoringScheme::Linear).unwrap();
        for pos in 0..s.len() {
            let col = s.column(pos);
            assert_abs_diff_eq!(col.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(s.prob(0, 0), 0.97);
        assert_abs_diff_eq!(s.prob(1, 0), 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(s.prob(3, 1), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(s.prob(0, 2), 0.0);
    }

    #[test]
    fn confidences_reject_bad_input() {
        let linear = ScoringScheme::Linear;
        assert!(matches!(
            ProbSequence::from_confidences(b"ACG", &[0.9, 0.9], linear),
            Err(PblastError::LengthMismatch { symbols: 3, probabilities: 2 })
        ));
        assert!(matches!(
            ProbSequence::from_confidences(b"", &[], linear),
            Err(PblastError::EmptySource("sequence"))
        ));
        assert!(matches!(
            ProbSequence::from_confidences(b"AC", &[0.9, 1.2], linear),
            Err(PblastError::InvalidProbability { pos: 1, .. })
        ));
        assert!(matches!(
            ProbSequence::from_confidences(b"AN", &[0.9, 0.9], linear),
            Err(PblastError::InvalidSymbol { pos: 1, symbol: 'N' })
        ));
    }

    #[test]
    fn score_char_uses_scheme() {
        let s = seq(b"ACGT", 0.5);
        assert_eq!(s.score_char(b'A', 0).unwrap(), 0.0);

        let s = seq(b"A", 0.81).with_scheme(ScoringScheme::Sqrt);
        assert_abs_diff_eq!(s.score_char(b'A', 0).unwrap(), 2.0 * 0.9 - 1.0, epsilon = 1e-12);
        assert!(matches!(s.score_char(b'N', 0), Err(PblastError::InvalidSymbol { .. })));
    }

    #[test]
    fn score_char_without_scheme_fails() {
        let s = ProbSequence::from_columns(vec![[0.25; SIGMA]], None);
        assert!(matches!(s.score_char(b'A', 0), Err(PblastError::MissingScheme)));
    }

    #[test]
    fn sub_window_clamps_and_copies() {
        let s = seq(b"ACGTAC", 0.9);
        let w = s.sub_window(-2, 3);
        assert_eq!(w.consensus(), b"ACG");
        assert_eq!(w.scheme(), Some(ScoringScheme::Linear));

        let w = s.sub_window(4, 100);
        assert_eq!(w.consensus(), b"AC");

        assert!(s.sub_window(10, 20).is_empty());
        assert!(s.sub_window(-5, -1).is_empty());
    }

    #[test]
    fn consensus_picks_max_probability() {
        let s = seq(b"GATTACA", 0.7);
        assert_eq!(s.consensus(), b"GATTACA");

        let tied = ProbSequence::from_columns(vec![[0.4, 0.1, 0.4, 0.1]], None);
        assert_eq!(tied.consensus_symbol(0), b'A');
    }

    #[test]
    fn prepend_builds_back_to_front() {
        let src = seq(b"ACGT", 0.9);
        let mut track = ProbSequence::new();
        track.prepend_copy(&src, 3);
        track.prepend_gap();
        track.prepend_copy(&src, 0);
        assert_eq!(track.len(), 3);
        assert_eq!(track.column(0), src.column(0));
        assert_eq!(track.column(1), &GAP_COLUMN);
        assert_eq!(track.column(2), src.column(3));
    }
}
