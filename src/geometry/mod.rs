//! Box geometry shared by the postprocessing stages.
//!
//! Boxes are corner-encoded `(x0, y0, x1, y1)` in f32. The pipeline stores
//! them column-wise in [`BoxColumns`] so the suppression sweep can read one
//! coordinate for many anchors at once.

pub mod orientation;

use crate::util::{DetPostError, DetPostResult};

/// Corner-encoded box in some coordinate frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnchorBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl AnchorBox {
    /// Creates a box from its corner coordinates.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Reads the box for anchor `index` from a flat `[x0, y0, x1, y1, ...]` tensor.
    ///
    /// The caller guarantees `boxes.len() >= 4 * (index + 1)`.
    #[inline]
    pub(crate) fn from_flat(boxes: &[f32], index: usize) -> Self {
        let base = index * 4;
        Self::new(
            boxes[base],
            boxes[base + 1],
            boxes[base + 2],
            boxes[base + 3],
        )
    }

    /// Returns `[x0, y0, x1, y1]`.
    pub fn to_array(self) -> [f32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }

    /// Area under the inclusive pixel-edge convention.
    #[inline]
    pub fn inclusive_area(&self) -> f32 {
        (self.x1 - self.x0 + 1.0) * (self.y1 - self.y0 + 1.0)
    }
}

impl From<[f32; 4]> for AnchorBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// Intersection over union with inclusive pixel edges.
///
/// Widths and heights are `max - min + 1`. Boxes whose overlap extent is
/// negative on either axis do not intersect. A zero union yields NaN, which
/// never exceeds a threshold.
#[inline]
pub fn iou_inclusive(a: &AnchorBox, b: &AnchorBox) -> f32 {
    let xx0 = a.x0.max(b.x0);
    let yy0 = a.y0.max(b.y0);
    let xx1 = a.x1.min(b.x1);
    let yy1 = a.y1.min(b.y1);

    let w = xx1 - xx0 + 1.0;
    let h = yy1 - yy0 + 1.0;
    if w < 0.0 || h < 0.0 {
        return 0.0;
    }

    let inter = w * h;
    inter / (a.inclusive_area() + b.inclusive_area() - inter)
}

/// Pixel dimensions of a model input or a destination image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: usize,
    pub height: usize,
}

impl ImageSize {
    /// Creates a size, rejecting zero extents.
    pub fn new(width: usize, height: usize) -> DetPostResult<Self> {
        if width == 0 || height == 0 {
            return Err(DetPostError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }
}

/// Column-wise box storage sized once for a fixed anchor count.
#[derive(Clone, Debug)]
pub struct BoxColumns {
    pub(crate) x0: Vec<f32>,
    pub(crate) y0: Vec<f32>,
    pub(crate) x1: Vec<f32>,
    pub(crate) y1: Vec<f32>,
}

impl BoxColumns {
    /// Allocates zeroed storage for `len` boxes.
    pub fn with_len(len: usize) -> Self {
        Self {
            x0: vec![0.0; len],
            y0: vec![0.0; len],
            x1: vec![0.0; len],
            y1: vec![0.0; len],
        }
    }

    /// Builds columns from a slice of boxes.
    pub fn from_boxes(boxes: &[AnchorBox]) -> Self {
        let mut cols = Self::with_len(boxes.len());
        for (idx, b) in boxes.iter().enumerate() {
            cols.set(idx, *b);
        }
        cols
    }

    /// Number of box slots.
    pub fn len(&self) -> usize {
        self.x0.len()
    }

    /// Returns true when there are no slots.
    pub fn is_empty(&self) -> bool {
        self.x0.is_empty()
    }

    /// Returns the box stored at `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> AnchorBox {
        AnchorBox::new(self.x0[idx], self.y0[idx], self.x1[idx], self.y1[idx])
    }

    /// Overwrites the box stored at `idx`.
    #[inline]
    pub fn set(&mut self, idx: usize, b: AnchorBox) {
        self.x0[idx] = b.x0;
        self.y0[idx] = b.y0;
        self.x1[idx] = b.x1;
        self.y1[idx] = b.y1;
    }
}
