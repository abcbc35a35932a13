//! Suppression kernels for the greedy NMS sweep.
//!
//! A kernel compares one kept anchor against every later anchor and clears
//! the validity flag of each one that overlaps it by more than the IoU
//! threshold. The scalar kernel is the reference; the SIMD kernel (feature
//! `simd`) produces bit-identical flags.

use crate::geometry::BoxColumns;

/// Kernel trait for the suppression sweep.
pub trait SuppressKernel {
    /// Invalidates every valid `j > anchor` with `IoU(anchor, j) > iou_threshold`.
    ///
    /// Returns the number of anchors invalidated.
    fn suppress_after(
        boxes: &BoxColumns,
        anchor: usize,
        valid: &mut [bool],
        iou_threshold: f32,
    ) -> usize;
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;
