/// Format a position in seconds as `m:ss`, truncating fractional seconds.
///
/// Unknown positions (NaN, infinities, negatives) render as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let total = secs as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
