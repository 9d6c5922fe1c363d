use std::fmt::Write as _;

use crate::error::{PblastError, Result};
use crate::model::ProbSequence;
use crate::util::dna;

/// 比对阶段假定的插入/删除率；与打分方案和 X-drop 参数无关
pub const INDEL_RATE: f64 = 0.07;

/// 每个间隙步的固定罚分：2 * 0.07 - 1
pub const GAP_COST: f64 = 2.0 * INDEL_RATE - 1.0;

/// DP 回溯指针
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Start,
    /// 基因组列对查询间隙
    Left,
    /// 匹配/替换
    Diagonal,
    /// 查询字符对基因组间隙
    Up,
}

impl Move {
    fn cigar_op(self) -> char {
        match self {
            Move::Diagonal => 'M',
            Move::Up => 'I',
            Move::Left => 'D',
            Move::Start => '?',
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Cell {
    value: f64,
    dir: Move,
}

const EMPTY_CELL: Cell = Cell { value: 0.0, dir: Move::Start };

/// DP 工作缓冲区，可跨调用复用
#[derive(Default)]
pub struct NwBuffer {
    cells: Vec<Cell>,
}

impl NwBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn resize(&mut self, size: usize) {
        self.cells.clear();
        self.cells.resize(size, EMPTY_CELL);
    }
}

/// 全局比对结果：带间隙的查询、带间隙的基因组窗口、DP 最优得分与路径
#[derive(Debug, Clone, PartialEq)]
pub struct NwAlignment {
    pub query: Vec<u8>,
    pub track: ProbSequence,
    pub score: f64,
    pub ops: Vec<Move>,
}

impl NwAlignment {
    pub fn cigar(&self) -> String {
        ops_to_cigar(&self.ops)
    }
}

/// 概率 Needleman-Wunsch 全局比对
pub fn global_align(query: &[u8], window: &ProbSequence) -> Result<NwAlignment> {
    global_align_with_buf(query, window, &mut NwBuffer::new())
}

pub fn global_align_with_buf(query: &[u8], window: &ProbSequence, buf: &mut NwBuffer) -> Result<NwAlignment> {
    let scheme = window.scheme().ok_or(PblastError::MissingScheme)?;
    let alpha = encode_query(query)?;

    // 两条序列都以下标 0 作为哨兵：查询的第 i 个字符为 alpha[i-1]，窗口第 j 列为 window[j-1]
    let rows = alpha.len() + 1;
    let cols = window.len() + 1;
    buf.resize(rows * cols);
    let h = &mut buf.cells;

    for i in 1..rows {
        h[i * cols] = Cell { value: h[(i - 1) * cols].value + GAP_COST, dir: Move::Up };
    }
    for j in 1..cols {
        h[j] = Cell { value: h[j - 1].value + GAP_COST, dir: Move::Left };
    }

    for i in 1..rows {
        let a = alpha[i - 1] as usize;
        for j in 1..cols {
            let diagonal = h[(i - 1) * cols + (j - 1)].value + window.score_base(scheme, a, j - 1);
            let top = h[(i - 1) * cols + j].value + GAP_COST;
            let left = h[i * cols + (j - 1)].value + GAP_COST;

            // 优先级：对角线 > 上 > 左，只有严格更大才替换
            let mut best = diagonal;
            let mut dir = Move::Diagonal;
            if top > best {
                best = top;
                dir = Move::Up;
            }
            if left > best {
                best = left;
                dir = Move::Left;
            }
            h[i * cols + j] = Cell { value: best, dir };
        }
    }

    let score = h[rows * cols - 1].value;

    // backtrack from the bottom-right corner, building outputs back to front
    let mut gapped: Vec<u8> = Vec::with_capacity(rows + cols);
    let mut ops: Vec<Move> = Vec::with_capacity(rows + cols);
    let mut track = ProbSequence::new().with_scheme(scheme);
    let mut i = rows - 1;
    let mut j = cols - 1;
    loop {
        let dir = h[i * cols + j].dir;
        match dir {
            Move::Start => {
                if i != 0 || j != 0 {
                    return Err(PblastError::Traceback { i, j });
                }
                break;
            }
            Move::Left => {
                gapped.push(dna::GAP);
                track.prepend_copy(window, j - 1);
                j -= 1;
            }
            Move::Diagonal => {
                gapped.push(dna::from_index(alpha[i - 1] as usize));
                track.prepend_copy(window, j - 1);
                i -= 1;
                j -= 1;
            }
            Move::Up => {
                gapped.push(dna::from_index(alpha[i - 1] as usize));
                track.prepend_gap();
                i -= 1;
            }
        }
        ops.push(dir);
    }
    gapped.reverse();
    ops.reverse();

    Ok(NwAlignment { query: gapped, track, score, ops })
}

/// 将查询编码为 0..4；出现 ACGT 以外的字符时报错
pub fn encode_query(query: &[u8]) -> Result<Vec<u8>> {
    query
        .iter()
        .enumerate()
        .map(|(pos, &b)| {
            dna::to_index(b)
                .map(|x| x as u8)
                .ok_or(PblastError::InvalidSymbol { pos, symbol: char::from(b) })
        })
        .collect()
}

pub fn ops_to_cigar(ops: &[Move]) -> String {
    let mut cigar = String::new();
    let mut iter = ops.iter().copied().filter(|&m| m != Move::Start);
    let Some(mut cur) = iter.next() else {
        return cigar;
    };
    let mut len = 1usize;
    for op in iter {
        if op == cur {
            len += 1;
        } else {
            let _ = write!(&mut cigar, "{}{}", len, cur.cigar_op());
            cur = op;
            len = 1;
        }
    }
    let _ = write!(&mut cigar, "{}{}", len, cur.cigar_op());
    cigar
}
