//! detpost turns raw object-detector outputs into labeled image-space boxes.
//!
//! Per frame, anchors below a confidence threshold are dropped, the rest are
//! rotated into the upright frame for the camera sensor orientation, greedy
//! NMS removes overlaps, and survivors are scaled to the destination image.
//! A bounded Top-K selector ranks classifier outputs.
//!
//! Optional features: `rayon` (parallel batch replay), `simd` (vectorized
//! suppression kernel), `image-io` (destination size from image files) and
//! `tracing` (spans and events).

mod trace;

pub mod candidate;
pub mod classify;
pub mod detect;
pub mod geometry;
#[cfg(feature = "image-io")]
pub mod io;
pub mod kernel;
pub mod lowlevel;
pub mod output;
pub mod tensor;
pub mod util;

pub use candidate::nms::NmsOrder;
pub use candidate::topk::{select_top_k, select_top_k_ranked, RankScore, Ranked, TopK};
pub use classify::{ClassScores, Classifier, RankedLabel};
pub use detect::{DetectConfig, Detector, Frame, ModelGeometry, PostprocessStats};
pub use geometry::orientation::Orientation;
pub use geometry::{AnchorBox, ImageSize};
pub use output::{DetectionBox, DetectionSlot, LabelTable};
pub use tensor::{ClassIndices, RawOutputs};
pub use util::{DetPostError, DetPostResult};
