//! Low-level building blocks for custom postprocessing pipelines.
//!
//! These expose the individual stages (threshold filtering, orientation
//! remapping, suppression kernels, rescaling) for callers that assemble their
//! own per-frame flow. Most users should prefer [`Detector`](crate::Detector).

pub use crate::candidate::filter::{filter_scores, is_valid_score, mark_valid, INVALID_SCORE};
pub use crate::candidate::nms::{greedy_nms, score_order_nms, suppress};
pub use crate::geometry::orientation::{inverse_remap_box, remap_box};
pub use crate::geometry::{iou_inclusive, BoxColumns};
pub use crate::kernel::scalar::SuppressScalar;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::SuppressSimd;
pub use crate::kernel::SuppressKernel;
pub use crate::output::rescale::rescale_detections;
