//! Pipeline output: labels, image-space detections and render hand-off.

pub mod handoff;
pub mod labels;
pub mod rescale;

pub use handoff::DetectionSlot;
pub use labels::LabelTable;
pub use rescale::{rescale_detections, DetectionBox, ScaleFactors};
