pub mod alignment;
pub mod evalue;
pub mod nw;
pub mod search;
pub mod seed;
pub mod ungapped;

pub use alignment::Alignment;
pub use evalue::KarlinParams;
pub use nw::{global_align, global_align_with_buf, Move, NwAlignment, NwBuffer, GAP_COST};
pub use search::{search, Searcher};
pub use seed::{find_seeds, Seed};
pub use ungapped::{extend_ungapped, UngappedHit, X_DROP_UNGAPPED};

use serde::{Deserialize, Serialize};

/// 搜索参数
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchOpt {
    /// 种子词长，须与索引一致
    pub word_len: usize,
    /// E 值阈值：严格小于该值才保留
    pub threshold: f64,
    pub karlin: KarlinParams,
    /// 无间隙延伸的 X-drop
    pub x_drop: f64,
    pub threads: usize,
}

impl Default for SearchOpt {
    fn default() -> Self {
        Self {
            word_len: 11,
            threshold: 1.0,
            karlin: KarlinParams::default(),
            x_drop: X_DROP_UNGAPPED,
            threads: 1,
        }
    }
}
