//! Byte counts rendered with binary (1024-based) units.
//!
//! One decimal digit, truncated rather than rounded: `1.99 KiB` prints
//! as `1.9KB`.

const KB: i64 = 1 << 10;
const MB: i64 = 1 << 20;
const GB: i64 = 1 << 30;

/// Render `bytes` as `B`, `KB`, `MB` or `GB`. Absent or non-positive
/// input yields `"0B"`.
pub fn human_size(bytes: Option<i64>) -> String {
    let b = match bytes {
        Some(b) if b > 0 => b,
        _ => return "0B".to_string(),
    };
    let (divisor, unit) = if b >= GB {
        (GB, "GB")
    } else if b >= MB {
        (MB, "MB")
    } else if b >= KB {
        (KB, "KB")
    } else {
        return format!("{}B", b);
    };
    let whole = b / divisor;
    // i128 keeps remainder * 10 from overflowing near i64::MAX
    let tenth = (i128::from(b % divisor) * 10 / i128::from(divisor)) as i64;
    format!("{}.{}{}", whole, tenth, unit)
}
