//! Monthly volume estimation arithmetic.

/// Days a month is projected over.
pub const DAYS_PER_MONTH: u64 = 31;

/// Project daily tweet counts to a month: mean daily count × 31, floored.
///
/// No data points means no matching tweets.
#[must_use]
pub fn monthly_estimate(daily_counts: &[u64]) -> u64 {
    let days = daily_counts.len() as u64;
    if days == 0 {
        return 0;
    }
    daily_counts.iter().sum::<u64>().saturating_mul(DAYS_PER_MONTH) / days
}

/// Filter by `min` (strictly greater; `None` or `0` keeps all) and sort by
/// volume, largest first. Ties keep their input order.
#[must_use]
pub fn rank_volumes(mut volumes: Vec<(String, u64)>, min: Option<u64>) -> Vec<(String, u64)> {
    if let Some(min) = min.filter(|m| *m > 0) {
        volumes.retain(|(_, v)| *v > min);
    }
    volumes.sort_by(|a, b| b.1.cmp(&a.1));
    volumes
}
