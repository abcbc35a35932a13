//! Greedy non-maximum suppression over anchor boxes.
//!
//! The default sweep walks anchors in index order, not score order: the first
//! valid anchor wins against any later overlapping anchor even if the later
//! one scores higher. [`NmsOrder::ScoreDescending`] selects classic
//! score-priority suppression instead.

use crate::candidate::filter::{is_valid_score, INVALID_SCORE};
use crate::geometry::{iou_inclusive, AnchorBox, BoxColumns};
use crate::kernel::SuppressKernel;

#[cfg(not(feature = "simd"))]
use crate::kernel::scalar::SuppressScalar as Suppress;
#[cfg(feature = "simd")]
use crate::kernel::simd::SuppressSimd as Suppress;

/// Visiting order of the greedy sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NmsOrder {
    /// Ascending anchor index.
    #[default]
    AnchorIndex,
    /// Descending score, ties by ascending index.
    ScoreDescending,
}

/// Index-order greedy NMS.
///
/// Valid anchors are taken in ascending index order until `max_outputs` are
/// kept; each kept anchor, except the one that fills the budget, clears the
/// `valid` flag of every later anchor whose IoU with it exceeds
/// `iou_threshold`. `keep` receives the kept indices in ascending order.
pub fn greedy_nms(
    boxes: &BoxColumns,
    valid: &mut [bool],
    max_outputs: usize,
    iou_threshold: f32,
    keep: &mut Vec<usize>,
) {
    debug_assert_eq!(boxes.len(), valid.len());
    keep.clear();
    if max_outputs == 0 {
        return;
    }

    for i in 0..boxes.len() {
        if !valid[i] {
            continue;
        }
        keep.push(i);
        if keep.len() >= max_outputs {
            break;
        }
        Suppress::suppress_after(boxes, i, valid, iou_threshold);
    }
}

/// Score-priority greedy NMS.
///
/// Same sweep as [`greedy_nms`] but over valid anchors sorted by descending
/// score. `order` is scratch space; `keep` receives kept indices in visiting
/// order (highest score first).
pub fn score_order_nms(
    boxes: &BoxColumns,
    scores: &[f32],
    valid: &mut [bool],
    max_outputs: usize,
    iou_threshold: f32,
    order: &mut Vec<usize>,
    keep: &mut Vec<usize>,
) {
    debug_assert_eq!(boxes.len(), valid.len());
    keep.clear();
    order.clear();
    if max_outputs == 0 {
        return;
    }

    order.extend((0..boxes.len()).filter(|&i| valid[i]));
    order.sort_unstable_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));

    for (pos, &i) in order.iter().enumerate() {
        if !valid[i] {
            continue;
        }
        keep.push(i);
        if keep.len() >= max_outputs {
            break;
        }
        let kept = boxes.get(i);
        for &j in &order[pos + 1..] {
            if valid[j] && iou_inclusive(&kept, &boxes.get(j)) > iou_threshold {
                valid[j] = false;
            }
        }
    }
}

/// Sentinel-score form of [`greedy_nms`].
///
/// Anchors whose score equals [`INVALID_SCORE`] are skipped; suppressed
/// anchors get their score overwritten with the sentinel. Returns the kept
/// indices in ascending order.
pub fn suppress(
    boxes: &[AnchorBox],
    scores: &mut [f32],
    max_outputs: usize,
    iou_threshold: f32,
) -> Vec<usize> {
    let n = boxes.len().min(scores.len());
    let cols = BoxColumns::from_boxes(&boxes[..n]);
    let mut valid: Vec<bool> = scores[..n].iter().map(|&s| is_valid_score(s)).collect();
    let mut keep = Vec::with_capacity(max_outputs.min(n));
    greedy_nms(&cols, &mut valid, max_outputs, iou_threshold, &mut keep);
    for (score, flag) in scores.iter_mut().zip(&valid) {
        if !flag {
            *score = INVALID_SCORE;
        }
    }
    keep
}
