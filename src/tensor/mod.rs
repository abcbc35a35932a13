//! Borrowed views over raw detector output tensors.
//!
//! The inference engine hands over three flat buffers per frame: box corners
//! (`4 * anchors` floats), scores (`anchors` floats) and class indices
//! (`anchors` entries of either `u8` or `i32`). [`RawOutputs`] checks that the
//! lengths agree once, so the per-frame stages can index without checks.

use crate::geometry::AnchorBox;
use crate::util::{DetPostError, DetPostResult};

/// Class index tensor in one of the dtypes detectors emit.
#[derive(Clone, Copy, Debug)]
pub enum ClassIndices<'a> {
    /// 8-bit unsigned indices.
    U8(&'a [u8]),
    /// 32-bit signed indices.
    I32(&'a [i32]),
}

impl<'a> ClassIndices<'a> {
    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::I32(v) => v.len(),
        }
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the class index of anchor `idx` widened to `i32`.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<i32> {
        match self {
            Self::U8(v) => v.get(idx).map(|&c| i32::from(c)),
            Self::I32(v) => v.get(idx).copied(),
        }
    }
}

/// Validated per-frame detector outputs.
#[derive(Clone, Copy, Debug)]
pub struct RawOutputs<'a> {
    boxes: &'a [f32],
    scores: &'a [f32],
    classes: ClassIndices<'a>,
}

impl<'a> RawOutputs<'a> {
    /// Wraps the three output buffers, checking that their lengths agree.
    pub fn new(
        boxes: &'a [f32],
        scores: &'a [f32],
        classes: ClassIndices<'a>,
    ) -> DetPostResult<Self> {
        let anchors = scores.len();
        let expected_boxes = anchors
            .checked_mul(4)
            .ok_or(DetPostError::BufferLengthMismatch {
                what: "boxes",
                expected: usize::MAX,
                got: boxes.len(),
            })?;
        if boxes.len() != expected_boxes {
            return Err(DetPostError::BufferLengthMismatch {
                what: "boxes",
                expected: expected_boxes,
                got: boxes.len(),
            });
        }
        if classes.len() != anchors {
            return Err(DetPostError::BufferLengthMismatch {
                what: "class indices",
                expected: anchors,
                got: classes.len(),
            });
        }
        Ok(Self {
            boxes,
            scores,
            classes,
        })
    }

    /// Number of anchors in the frame.
    pub fn num_anchors(&self) -> usize {
        self.scores.len()
    }

    /// Flat box tensor.
    pub fn boxes(&self) -> &'a [f32] {
        self.boxes
    }

    /// Score tensor.
    pub fn scores(&self) -> &'a [f32] {
        self.scores
    }

    /// Class index tensor.
    pub fn classes(&self) -> ClassIndices<'a> {
        self.classes
    }

    /// Raw box of anchor `idx`.
    #[inline]
    pub fn anchor_box(&self, idx: usize) -> AnchorBox {
        AnchorBox::from_flat(self.boxes, idx)
    }

    /// Score of anchor `idx`.
    #[inline]
    pub fn score(&self, idx: usize) -> f32 {
        self.scores[idx]
    }

    /// Class index of anchor `idx`.
    #[inline]
    pub fn class_index(&self, idx: usize) -> i32 {
        match self.classes {
            ClassIndices::U8(v) => i32::from(v[idx]),
            ClassIndices::I32(v) => v[idx],
        }
    }
}
