use std::fmt::Write;

use crate::config::{FMT_BASE, FMT_PREC};

const PREFIX: [char; 9] = ['b', 'k', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y'];

/// 格式化失败时的占位符
pub const FALLBACK: &str = "-";

/// 格式化字节数显示，例如 1000 -> "1.0k"，1_500_000_000 -> "1.5G"
pub fn format_bytes(bytes: u64) -> String {
    let mut scaled = bytes as f64;
    let mut i = 0;
    while i + 1 < PREFIX.len() && scaled >= FMT_BASE {
        scaled /= FMT_BASE;
        i += 1;
    }
    // 999.95k 这类值四舍五入后会变成 1000.0k，需要再进一位
    let step = 10f64.powi(FMT_PREC as i32);
    if i + 1 < PREFIX.len() && (scaled * step).round() / step >= FMT_BASE {
        scaled /= FMT_BASE;
        i += 1;
    }

    let mut out = String::with_capacity(16);
    if write!(out, "{:.*}{}", FMT_PREC, scaled, PREFIX[i]).is_err() {
        return FALLBACK.to_string();
    }
    out
}
