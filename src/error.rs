//! 统一的错误类型。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PblastError {
    /// I/O 错误（文件不存在、权限不足等）
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 数值格式错误
    #[error("parse error: {0}")]
    Parse(String),

    /// 序列或置信度来源为空
    #[error("{0} source is empty")]
    EmptySource(&'static str),

    #[error("sequence has {symbols} symbols but {probabilities} probabilities were given")]
    LengthMismatch { symbols: usize, probabilities: usize },

    #[error("probability {value} at position {pos} is outside [0, 1]")]
    InvalidProbability { pos: usize, value: f64 },

    #[error("invalid symbol '{symbol}' at position {pos}")]
    InvalidSymbol { pos: usize, symbol: char },

    /// 打分时未设置打分方案
    #[error("no scoring scheme configured for this sequence")]
    MissingScheme,

    #[error("unrecognized scoring scheme '{0}' (expected linear, sqrt or pow1.5)")]
    UnknownScheme(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// 回溯走到了原点以外的起始标记，说明 DP 矩阵构造有误
    #[error("traceback reached an undefined backpointer at ({i}, {j})")]
    Traceback { i: usize, j: usize },
}

pub type Result<T> = std::result::Result<T, PblastError>;
