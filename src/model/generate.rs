use rand::Rng;

use crate::error::{PblastError, Result};
use crate::model::sequence::ProbSequence;
use crate::util::dna::{self, SIGMA};

/// 按概率序列随机生成查询序列，并按给定概率引入插入与删除。
///
/// 对 `[start, start + len)` 中的每个位置依次：
/// 1. 以 `del_prob` 的概率跳过该位置（删除）；
/// 2. 以 `ins_prob` 的概率先追加一个均匀抽取的碱基（插入）；
/// 3. 按 A, C, G 的累积概率抽取一个碱基，落在最后区间时取 T。
///
/// 随机源可以是任意 [`Rng`]，传入固定种子的 `StdRng` 即可复现。
pub fn generate_query<R: Rng + ?Sized>(
    genome: &ProbSequence,
    start: usize,
    len: usize,
    ins_prob: f64,
    del_prob: f64,
    rng: &mut R,
) -> Result<Vec<u8>> {
    let end = start
        .checked_add(len)
        .filter(|&e| e <= genome.len())
        .ok_or_else(|| {
            PblastError::InvalidInput(format!(
                "query window [{}, {}+{}) exceeds genome length {}",
                start,
                start,
                len,
                genome.len()
            ))
        })?;
    for p in [ins_prob, del_prob] {
        if !(0.0..=1.0).contains(&p) {
            return Err(PblastError::InvalidProbability { pos: start, value: p });
        }
    }

    let mut out = Vec::with_capacity(len + len / 8);
    for pos in start..end {
        if rng.random::<f64>() < del_prob {
            continue;
        }
        if rng.random::<f64>() < ins_prob {
            out.push(dna::from_index(rng.random_range(0..SIGMA)));
        }
        out.push(sample_base(genome, pos, rng.random::<f64>()));
    }
    Ok(out)
}

/// 累积选择：T 为剩余分支，不显式比较
#[inline]
fn sample_base(genome: &ProbSequence, pos: usize, r: f64) -> u8 {
    let col = genome.column(pos);
    let mut acc = 0.0;
    for (b, &p) in col.iter().enumerate().take(SIGMA - 1) {
        acc += p;
        if r < acc {
            return dna::from_index(b);
        }
    }
    dna::from_index(SIGMA - 1)
}
