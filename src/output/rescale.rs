//! Mapping surviving anchors from model input space to image pixels.

use crate::geometry::{AnchorBox, BoxColumns, ImageSize};
use crate::output::labels::LabelTable;
use crate::tensor::RawOutputs;

/// A labeled detection in destination image pixels.
///
/// Vertical edges follow the renderer convention: `bottom` is the scaled
/// `y0` edge and `top` the scaled `y1` edge of the upright box.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionBox {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    /// Original network confidence.
    pub confidence: f32,
    /// Class index as read from the tensor.
    pub class_index: i32,
    /// Label resolved modulo the label table length.
    pub label: String,
}

/// Independent x and y scale factors from model input to destination image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleFactors {
    pub x: f32,
    pub y: f32,
}

impl ScaleFactors {
    /// Factors mapping `model` input pixels to `dest` pixels.
    pub fn between(model: ImageSize, dest: ImageSize) -> Self {
        Self {
            x: dest.width as f32 / model.width as f32,
            y: dest.height as f32 / model.height as f32,
        }
    }

    /// Scales the box edges into a detection with the given metadata.
    #[inline]
    pub fn apply(
        &self,
        b: AnchorBox,
        confidence: f32,
        class_index: i32,
        labels: &LabelTable,
    ) -> DetectionBox {
        DetectionBox {
            left: b.x0 * self.x,
            bottom: b.y0 * self.y,
            right: b.x1 * self.x,
            top: b.y1 * self.y,
            confidence,
            class_index,
            label: labels.get(class_index).to_owned(),
        }
    }
}

/// Converts surviving anchor indices into labeled image-space detections.
///
/// `boxes` holds the orientation-corrected boxes indexed like `raw`. Anchor 0
/// is a padding slot in the supported detectors and is dropped when
/// `skip_background` is set. Appends to `out` in the order of `survivors`;
/// returns the number appended.
#[allow(clippy::too_many_arguments)]
pub fn rescale_detections(
    survivors: &[usize],
    boxes: &BoxColumns,
    raw: &RawOutputs<'_>,
    model: ImageSize,
    dest: ImageSize,
    labels: &LabelTable,
    skip_background: bool,
    out: &mut Vec<DetectionBox>,
) -> usize {
    let scale = ScaleFactors::between(model, dest);
    let start = out.len();
    for &idx in survivors {
        if skip_background && idx == 0 {
            continue;
        }
        out.push(scale.apply(boxes.get(idx), raw.score(idx), raw.class_index(idx), labels));
    }
    out.len() - start
}
