//! Scalar reference suppression kernel.

use crate::geometry::{iou_inclusive, BoxColumns};
use crate::kernel::SuppressKernel;

/// Scalar suppression kernel.
pub struct SuppressScalar;

impl SuppressScalar {
    /// Suppresses within `range` only; shared with the SIMD tail.
    #[inline]
    pub(crate) fn suppress_range(
        boxes: &BoxColumns,
        anchor: usize,
        range: std::ops::Range<usize>,
        valid: &mut [bool],
        iou_threshold: f32,
    ) -> usize {
        let kept = boxes.get(anchor);
        let mut suppressed = 0usize;
        for j in range {
            if !valid[j] {
                continue;
            }
            if iou_inclusive(&kept, &boxes.get(j)) > iou_threshold {
                valid[j] = false;
                suppressed += 1;
            }
        }
        suppressed
    }
}

impl SuppressKernel for SuppressScalar {
    fn suppress_after(
        boxes: &BoxColumns,
        anchor: usize,
        valid: &mut [bool],
        iou_threshold: f32,
    ) -> usize {
        Self::suppress_range(boxes, anchor, anchor + 1..boxes.len(), valid, iou_threshold)
    }
}
