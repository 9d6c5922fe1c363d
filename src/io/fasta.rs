use std::io::BufRead;

use crate::error::Result;
use crate::util::dna;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

/// 读取查询序列。
///
/// 支持 FASTA（多行记录，`>id 描述` 头）或每行一条的纯文本，后者的 id 依次为
/// `query1`、`query2`……序列统一大写，合法性交给搜索阶段校验。
pub fn read_queries<R: BufRead>(reader: R) -> Result<Vec<QueryRecord>> {
    let mut records: Vec<QueryRecord> = Vec::new();
    let mut in_fasta = false;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            in_fasta = true;
            let id = header.split_whitespace().next().unwrap_or("").to_string();
            records.push(QueryRecord { id, seq: Vec::new() });
            continue;
        }

        let chunk = line.bytes().filter(|b| !b.is_ascii_whitespace());
        if in_fasta {
            if let Some(rec) = records.last_mut() {
                rec.seq.extend(chunk);
            }
        } else {
            let id = format!("query{}", records.len() + 1);
            records.push(QueryRecord { id, seq: chunk.collect() });
        }
    }

    for rec in &mut records {
        rec.seq = dna::normalize_seq(&rec.seq);
    }
    Ok(records)
}
