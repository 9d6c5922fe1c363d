//! 演示如何在 library 模式下使用 pblast-rust 搜索概率基因组。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_search
//! ```

use pblast_rust::align::{self, SearchOpt};
use pblast_rust::index::KmerIndex;
use pblast_rust::model::{self, ProbSequence, ScoringScheme};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> pblast_rust::Result<()> {
    // 1. 构建概率基因组：声明碱基 + 置信度
    let reference = b"ACGTACGTAGCTGATCGTAGCTAGCTAGCTGATCGTAGCTAGCTAGCTGATTGCAACGGTACCATG";
    let confidences: Vec<f64> = (0..reference.len()).map(|i| 0.85 + (i % 7) as f64 * 0.02).collect();
    let genome = ProbSequence::from_confidences(reference, &confidences, ScoringScheme::Linear)?;
    println!("基因组长度: {} bp", genome.len());
    println!("共识序列: {}", String::from_utf8_lossy(&genome.consensus()));

    // 2. 构建 k-mer 索引
    let word_len = 6;
    let index = KmerIndex::build(&genome, word_len)?;
    println!("索引: {} 个不同 k-mer, {} 个位置", index.len(), index.total_positions());

    // 3. 按概率抽样一条带插入/删除的查询
    let mut rng = StdRng::seed_from_u64(7);
    let query = model::generate_query(&genome, 30, 24, 0.05, 0.05, &mut rng)?;
    println!("\n查询（来自偏移 30）: {}", String::from_utf8_lossy(&query));

    // 4. 种子-延伸搜索
    let opt = SearchOpt { word_len, ..SearchOpt::default() };
    let hits = align::search(&query, &genome, &index, &opt)?;
    println!("找到 {} 个显著比对:\n", hits.len());
    for aln in &hits {
        println!("{}", aln);
    }

    println!("完成！");
    Ok(())
}
