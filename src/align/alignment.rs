use std::fmt;

use serde::Serialize;

use super::nw::NwAlignment;
use crate::model::ProbSequence;

/// 通过显著性过滤的比对结果，返回后归调用方所有
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alignment {
    /// 带间隙的查询序列（`-` 表示间隙）
    #[serde(serialize_with = "serialize_ascii")]
    pub query: Vec<u8>,
    /// 带间隙的基因组窗口，间隙列概率全为 0
    pub track: ProbSequence,
    /// DP 最优原始得分
    pub score: f64,
    pub evalue: f64,
    /// 由 DP 得分换算的比特分
    pub bit_score: f64,
    /// 窗口在基因组上的起点 `g - i`，可能为负（窗口已截断到 0）
    pub offset: isize,
    pub cigar: String,
}

impl Alignment {
    pub fn from_nw(nw: NwAlignment, offset: isize, evalue: f64, bit_score: f64) -> Self {
        let cigar = nw.cigar();
        Self {
            query: nw.query,
            track: nw.track,
            score: nw.score,
            evalue,
            bit_score,
            offset,
            cigar,
        }
    }

    pub fn query_str(&self) -> &str {
        std::str::from_utf8(&self.query).unwrap_or("")
    }
}

fn serialize_ascii<S: serde::Serializer>(seq: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(seq))
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Alignment with E value: {:.3e} at index {} (score {:.3}, bits {:.2}, {})",
            self.evalue, self.offset, self.score, self.bit_score, self.cigar
        )?;
        write!(f, "Q:")?;
        for &c in &self.query {
            write!(f, "\t{}", char::from(c))?;
        }
        writeln!(f)?;
        write!(f, "{}", self.track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::nw::global_align;
    use crate::model::ScoringScheme;

    #[test]
    fn display_and_json() {
        let w = ProbSequence::from_confidences(b"ACG", &[0.9, 0.9, 0.9], ScoringScheme::Linear).unwrap();
        let aln = Alignment::from_nw(global_align(b"AG", &w).unwrap(), 5, 0.25, 1.5);
        assert_eq!(aln.query_str(), "A-G");
        assert_eq!(aln.cigar, "1M1D1M");

        let text = aln.to_string();
        assert!(text.starts_with("Alignment with E value: 2.500e-1 at index 5"));
        assert!(text.lines().next().unwrap().contains("bits 1.50"));
        assert_eq!(text.lines().count(), 6);

        let json: serde_json::Value = serde_json::to_value(&aln).unwrap();
        assert_eq!(json["query"], "A-G");
        assert_eq!(json["offset"], 5);
        assert_eq!(json["bit_score"], 1.5);
        assert_eq!(json["track"]["cols"].as_array().unwrap().len(), 3);
    }
}
