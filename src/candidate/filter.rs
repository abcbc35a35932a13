//! Confidence threshold filtering for anchors.

/// Score written into invalidated anchors by [`filter_scores`].
///
/// Legitimate confidences lie in `[0, 1]`, so this can never pass a
/// threshold inside that range.
pub const INVALID_SCORE: f32 = -10000.0;

/// Replaces every score that does not reach `threshold` with [`INVALID_SCORE`].
///
/// Scores at or above the threshold are left untouched. NaN scores fail the
/// comparison and are invalidated as well. Applying the filter twice with the
/// same threshold changes nothing the second time.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn filter_scores(scores: &mut [f32], threshold: f32) {
    for score in scores.iter_mut() {
        if !(*score >= threshold) {
            *score = INVALID_SCORE;
        }
    }
}

/// Returns true unless `score` is the invalidation sentinel.
#[inline]
pub fn is_valid_score(score: f32) -> bool {
    score != INVALID_SCORE
}

/// Mask form of [`filter_scores`]: `valid[i]` becomes `scores[i] >= threshold`.
///
/// Scores are not modified, so confidences reported later are always the
/// original network values. Returns the number of valid anchors.
pub fn mark_valid(scores: &[f32], threshold: f32, valid: &mut [bool]) -> usize {
    debug_assert_eq!(scores.len(), valid.len());
    let mut count = 0usize;
    for (flag, &score) in valid.iter_mut().zip(scores) {
        *flag = score >= threshold;
        count += usize::from(*flag);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::{filter_scores, is_valid_score, mark_valid, INVALID_SCORE};

    #[test]
    fn filter_replaces_only_low_scores() {
        let mut scores = [0.9, 0.2, 0.19, 0.0, 1.0];
        filter_scores(&mut scores, 0.2);
        assert_eq!(scores, [0.9, 0.2, INVALID_SCORE, INVALID_SCORE, 1.0]);
        assert!(!is_valid_score(scores[2]));
        assert!(is_valid_score(scores[1]));
    }

    #[test]
    fn filter_is_idempotent() {
        let mut once = [0.5, 0.1, 0.7, 0.3];
        filter_scores(&mut once, 0.4);
        let mut twice = once;
        filter_scores(&mut twice, 0.4);
        assert_eq!(once, twice);
    }

    #[test]
    fn nan_scores_are_invalidated() {
        let mut scores = [f32::NAN, 0.8];
        filter_scores(&mut scores, 0.2);
        assert_eq!(scores[0], INVALID_SCORE);

        let mut valid = [true; 2];
        assert_eq!(mark_valid(&[f32::NAN, 0.8], 0.2, &mut valid), 1);
        assert_eq!(valid, [false, true]);
    }

    #[test]
    fn mask_matches_sentinel_form() {
        let scores = [0.05, 0.25, 0.2, 0.95, 0.199];
        let mut sentinel = scores;
        filter_scores(&mut sentinel, 0.2);
        let mut valid = [false; 5];
        let count = mark_valid(&scores, 0.2, &mut valid);
        assert_eq!(count, 3);
        for (flag, s) in valid.iter().zip(sentinel.iter()) {
            assert_eq!(*flag, is_valid_score(*s));
        }
    }
}
