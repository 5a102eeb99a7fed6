use crate::models::job::RankedJob;

/// Drops jobs below `min_score`, orders by score descending, keeps the top `max_results`.
///
/// The sort is stable, but scored jobs arrive in completion order, so ties
/// have no meaningful order.
pub fn rank(mut scored: Vec<RankedJob>, min_score: u8, max_results: usize) -> Vec<RankedJob> {
    scored.retain(|job| job.match_score >= min_score);
    scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    scored.truncate(max_results);
    scored
}
