use crate::model::{ProbSequence, ScoringScheme};

/// 默认 X-drop：当前得分低于运行最大值超过该值时停止延伸
pub const X_DROP_UNGAPPED: f64 = 10.0;

/// 无间隙延伸得到的高分片段（HSP）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UngappedHit {
    /// 右侧最佳得分 + 左侧最佳得分
    pub score: f64,
    /// 查询上的区间 [q_begin, q_end)
    pub q_begin: usize,
    pub q_end: usize,
    /// 基因组上的起点，与 q_begin 同对角线
    pub g_begin: usize,
}

/// 从种子 (q_pos, g_pos) 出发做无间隙 X-drop 延伸。
///
/// 先向右（含种子位置）再向左（从种子前一位开始）；运行最大值在得分相等时也更新，
/// 因为线性方案下 p = 0.5 的得分恰好为 0，不应被视为下降。
/// `query` 为 0..4 编码的碱基。
pub fn extend_ungapped(
    query: &[u8],
    genome: &ProbSequence,
    scheme: ScoringScheme,
    q_pos: usize,
    g_pos: usize,
    x_drop: f64,
) -> UngappedHit {
    // right, including the seed
    let mut cur = 0.0;
    let mut best_right = 0.0;
    let mut right_len = 0usize;
    let (mut qi, mut gi) = (q_pos, g_pos);
    while qi < query.len() && gi < genome.len() {
        cur += genome.score_base(scheme, query[qi] as usize, gi);
        if cur >= best_right {
            best_right = cur;
            right_len = qi - q_pos + 1;
        }
        if cur < best_right - x_drop {
            break;
        }
        qi += 1;
        gi += 1;
    }

    // left, from one before the seed
    let mut cur = 0.0;
    let mut best_left = 0.0;
    let mut left_len = 0usize;
    let steps = q_pos.min(g_pos);
    for k in 1..=steps {
        cur += genome.score_base(scheme, query[q_pos - k] as usize, g_pos - k);
        if cur >= best_left {
            best_left = cur;
            left_len = k;
        }
        if cur < best_left - x_drop {
            break;
        }
    }

    UngappedHit {
        score: best_left + best_right,
        q_begin: q_pos - left_len,
        q_end: q_pos + right_len,
        g_begin: g_pos - left_len,
    }
}
