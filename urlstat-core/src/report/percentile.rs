/// Nearest-rank percentile of an ascending sample.
///
/// `rank = ceil(pct / 100 * len) - 1`, clamped to the sample bounds, so the
/// result is always one of the samples. For `[1, 2, ..., 10]` this gives
/// p50 = 5, p95 = 10 and p99 = 10.
pub fn nearest_rank<T: Copy>(sorted: &[T], pct: f64) -> Option<T> {
    let last = sorted.len().checked_sub(1)?;

    let rank = (pct * sorted.len() as f64 / 100.0).ceil();
    let index = if rank.is_nan() || rank <= 1.0 {
        0
    } else {
        (rank as usize - 1).min(last)
    };

    Some(sorted[index])
}
