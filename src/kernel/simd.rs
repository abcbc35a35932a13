//! SIMD suppression kernel using the `wide` crate.
//!
//! Eight later anchors are compared against the kept anchor per step using
//! `f32x8`. Every lane performs the same IEEE operations in the same order as
//! [`iou_inclusive`](crate::geometry::iou_inclusive), so the resulting flags
//! match the scalar kernel exactly. The remainder is handled by the scalar
//! kernel.

use crate::geometry::BoxColumns;
use crate::kernel::scalar::SuppressScalar;
use crate::kernel::SuppressKernel;
use wide::f32x8;

const LANES: usize = 8;

/// Load 8 f32 values into f32x8.
#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

#[inline]
fn broadcast(value: f32) -> f32x8 {
    f32x8::from([value; LANES])
}

/// SIMD-accelerated suppression kernel.
pub struct SuppressSimd;

impl SuppressKernel for SuppressSimd {
    fn suppress_after(
        boxes: &BoxColumns,
        anchor: usize,
        valid: &mut [bool],
        iou_threshold: f32,
    ) -> usize {
        let len = boxes.len();
        let kept = boxes.get(anchor);
        let one = broadcast(1.0);
        let kx0 = broadcast(kept.x0);
        let ky0 = broadcast(kept.y0);
        let kx1 = broadcast(kept.x1);
        let ky1 = broadcast(kept.y1);
        let kept_area = broadcast(kept.inclusive_area());

        let mut suppressed = 0usize;
        let mut j = anchor + 1;
        while j + LANES <= len {
            let lanes = &mut valid[j..j + LANES];
            if lanes.iter().all(|v| !*v) {
                j += LANES;
                continue;
            }

            let bx0 = load_f32x8(&boxes.x0[j..]);
            let by0 = load_f32x8(&boxes.y0[j..]);
            let bx1 = load_f32x8(&boxes.x1[j..]);
            let by1 = load_f32x8(&boxes.y1[j..]);

            let w = kx1.min(bx1) - kx0.max(bx0) + one;
            let h = ky1.min(by1) - ky0.max(by0) + one;
            let inter = w * h;
            let other_area = (bx1 - bx0 + one) * (by1 - by0 + one);
            let iou = inter / (kept_area + other_area - inter);

            let w = w.to_array();
            let h = h.to_array();
            let iou = iou.to_array();
            for lane in 0..LANES {
                if !lanes[lane] || w[lane] < 0.0 || h[lane] < 0.0 {
                    continue;
                }
                if iou[lane] > iou_threshold {
                    lanes[lane] = false;
                    suppressed += 1;
                }
            }
            j += LANES;
        }

        suppressed + SuppressScalar::suppress_range(boxes, anchor, j..len, valid, iou_threshold)
    }
}
