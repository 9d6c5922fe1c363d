use std::collections::HashSet;

use crate::index::KmerIndex;

/// 种子：查询与共识序列上长度为词长的精确匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    pub q_pos: usize,
    pub g_pos: usize,
    /// 隐含的比对偏移 `g_pos - q_pos`
    pub offset: isize,
}

/// 枚举查询中每个完整词在索引中的命中，同一偏移只保留最先发现的种子。
///
/// 返回顺序即发现顺序：按查询位置升序，同一查询位置内按基因组位置升序。
/// 词不在索引中属于正常情况，直接跳过。
pub fn find_seeds(query: &[u8], index: &KmerIndex) -> Vec<Seed> {
    let w = index.word_len();
    if w == 0 || query.len() < w {
        return Vec::new();
    }

    let mut visited: HashSet<isize> = HashSet::new();
    let mut seeds = Vec::new();
    for (q_pos, word) in query.windows(w).enumerate() {
        let Some(positions) = index.get(word) else {
            continue;
        };
        for &g_pos in positions {
            let offset = g_pos as isize - q_pos as isize;
            if visited.insert(offset) {
                seeds.push(Seed { q_pos, g_pos, offset });
            }
        }
    }
    seeds
}
