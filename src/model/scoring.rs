use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PblastError;

/// 概率到得分的映射方案：`score = 2 * p^e - 1`，取值范围 [-1, 1]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringScheme {
    #[default]
    Linear,
    Sqrt,
    Pow15,
}

impl ScoringScheme {
    pub const ALL: [ScoringScheme; 3] = [ScoringScheme::Linear, ScoringScheme::Sqrt, ScoringScheme::Pow15];

    #[inline]
    pub fn exponent(self) -> f64 {
        match self {
            ScoringScheme::Linear => 1.0,
            ScoringScheme::Sqrt => 0.5,
            ScoringScheme::Pow15 => 1.5,
        }
    }

    #[inline]
    pub fn score(self, p: f64) -> f64 {
        match self {
            // 线性方案单独处理，保证 p = 0.5 时得分恰为 0
            ScoringScheme::Linear => 2.0 * p - 1.0,
            _ => 2.0 * p.powf(self.exponent()) - 1.0,
        }
    }
}

impl fmt::Display for ScoringScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoringScheme::Linear => "linear",
            ScoringScheme::Sqrt => "sqrt",
            ScoringScheme::Pow15 => "pow1.5",
        };
        f.write_str(name)
    }
}

impl FromStr for ScoringScheme {
    type Err = PblastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "1" => Ok(ScoringScheme::Linear),
            "sqrt" | "square-root" | "0.5" => Ok(ScoringScheme::Sqrt),
            "pow1.5" | "pow15" | "power-1.5" | "1.5" => Ok(ScoringScheme::Pow15),
            other => Err(PblastError::UnknownScheme(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_midpoint_is_zero() {
        assert_eq!(ScoringScheme::Linear.score(0.5), 0.0);
    }

    #[test]
    fn scores_span_unit_interval() {
        for scheme in ScoringScheme::ALL {
            assert_abs_diff_eq!(scheme.score(0.0), -1.0);
            assert_abs_diff_eq!(scheme.score(1.0), 1.0);
        }
    }

    #[test]
    fn scores_are_monotonic_in_probability() {
        for scheme in ScoringScheme::ALL {
            let mut prev = f64::NEG_INFINITY;
            for step in 0..=100 {
                let s = scheme.score(step as f64 / 100.0);
                assert!(s > prev, "{} not increasing at step {}", scheme, step);
                prev = s;
            }
        }
    }

    #[test]
    fn parse_names_and_reject_unknown() {
        for scheme in ScoringScheme::ALL {
            assert_eq!(scheme.to_string().parse::<ScoringScheme>().unwrap(), scheme);
        }
        assert_eq!("square-root".parse::<ScoringScheme>().unwrap(), ScoringScheme::Sqrt);
        assert!(matches!(
            "cubic".parse::<ScoringScheme>(),
            Err(PblastError::UnknownScheme(_))
        ));
    }
}
