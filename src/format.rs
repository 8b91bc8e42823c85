//! Display formatting for mineral amounts.

/// Format a mineral amount the way every screen and report renders it:
/// `1.5k`, `2.50M`, `3.01B`, `1.20T`, plain truncated integer below 1000.
///
/// k keeps one decimal; M/B/T keep two. Truncation (not rounding) below
/// 1000 matches the ledger's display convention — fractional minerals
/// accumulate internally but are never shown.
pub fn format_for_display(value: f64) -> String {
    if value >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.1}k", value / 1e3)
    } else {
        format!("{}", value.trunc() as i64)
    }
}
