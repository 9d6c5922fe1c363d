use std::collections::HashMap;

use crate::error::{PblastError, Result};
use crate::model::ProbSequence;

/// k-mer 索引：共识序列中长度为 `word_len` 的子串 -> 升序起始位置列表。
///
/// 每个（基因组，词长）构建一次，之后只读。共识取每列概率最大的碱基，
/// 假定被索引的位置不存在概率并列。
#[derive(Debug, Clone)]
pub struct KmerIndex {
    word_len: usize,
    map: HashMap<Vec<u8>, Vec<usize>>,
}

impl KmerIndex {
    /// 单次从左到右扫描，窗口恰好为 `word_len` 个共识碱基
    pub fn build(genome: &ProbSequence, word_len: usize) -> Result<Self> {
        if word_len == 0 {
            return Err(PblastError::InvalidInput("word length must be positive".to_string()));
        }
        let consensus = genome.consensus();
        let mut map: HashMap<Vec<u8>, Vec<usize>> = HashMap::new();
        for (start, word) in consensus.windows(word_len).enumerate() {
            map.entry(word.to_vec()).or_default().push(start);
        }
        log::debug!(
            "built k-mer index: word_len={}, genome_len={}, distinct_words={}",
            word_len,
            genome.len(),
            map.len()
        );
        Ok(Self { word_len, map })
    }

    #[inline]
    pub fn word_len(&self) -> usize {
        self.word_len
    }

    #[inline]
    pub fn get(&self, word: &[u8]) -> Option<&[usize]> {
        self.map.get(word).map(Vec::as_slice)
    }

    /// 不同 k-mer 的数量
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn total_positions(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }
}
