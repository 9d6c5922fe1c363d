/// 字母表大小：{0:A, 1:C, 2:G, 3:T}
pub const SIGMA: usize = 4;

/// 固定的碱基顺序，概率列、累积抽样与共识并列时的选择都依赖该顺序
pub const BASES: [u8; SIGMA] = *b"ACGT";

/// 对齐结果中的间隙符号
pub const GAP: u8 = b'-';

#[inline]
pub fn to_index(b: u8) -> Option<usize> {
    match b.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' | b'U' => Some(3),
        _ => None,
    }
}

#[inline]
pub fn from_index(i: usize) -> u8 {
    BASES[i]
}

/// 大写化并将 U 视为 T；其他字符原样保留，交给调用方校验
pub fn normalize_seq(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .map(|&b| match b.to_ascii_uppercase() {
            b'U' => b'T',
            up => up,
        })
        .collect()
}
