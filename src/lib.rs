//! # pblast-rust
//!
//! 面向概率基因组的 BLAST 式序列搜索。
//!
//! 基因组的每个位置是 A/C/G/T 上的一个概率分布，本 crate 提供：
//!
//! - **概率序列模型**：按列存储碱基概率，支持线性 / 平方根 / 1.5 次幂三种打分方案
//! - **k-mer 索引**：基于共识序列的定长词索引
//! - **种子延伸**：X-drop 无间隙延伸 + E 值预过滤
//! - **全局比对**：概率 Needleman-Wunsch，带回溯
//! - **显著性模型**：`E = K·m·n·exp(-λ·s)`
//!
//! ## 快速示例
//!
//! ```rust
//! use pblast_rust::align::{self, SearchOpt};
//! use pblast_rust::index::KmerIndex;
//! use pblast_rust::model::{ProbSequence, ScoringScheme};
//!
//! let genome = ProbSequence::from_confidences(
//!     b"ACGTACGTACGT",
//!     &[0.97; 12],
//!     ScoringScheme::Linear,
//! )
//! .unwrap();
//! let index = KmerIndex::build(&genome, 4).unwrap();
//! let opt = SearchOpt { word_len: 4, ..SearchOpt::default() };
//!
//! let hits = align::search(b"GTACGT", &genome, &index, &opt).unwrap();
//! assert_eq!(hits[0].offset, 2);
//! assert!(hits[0].evalue < 1.0);
//! ```
//!
//! ## 模块说明
//!
//! - [`model`] — 概率序列、打分方案、随机查询生成
//! - [`index`] — k-mer 索引
//! - [`align`] — 种子查找、无间隙延伸、全局比对、E 值与搜索引擎
//! - [`io`] — 基因组（序列 + 置信度）与查询文件读取
//! - [`eval`] — 灵敏度 / 假阳性率批量评估
//! - [`util`] — DNA 字母表工具函数

pub mod align;
pub mod error;
pub mod eval;
pub mod index;
pub mod io;
pub mod model;
pub mod util;

pub use error::{PblastError, Result};
