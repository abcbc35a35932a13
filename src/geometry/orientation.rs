//! Sensor orientation correction for model-output boxes.
//!
//! Camera frames reach the model pre-rotated by the sensor mounting angle.
//! Boxes must be mapped back into the canonical upright frame before any
//! box-to-box comparison. The mappings only permute coordinates and subtract
//! them from the model input extents, so they are exact in f32 whenever the
//! inputs are representable.

use crate::geometry::AnchorBox;
use crate::util::{DetPostError, DetPostResult};

/// Degrees clockwise the raw frame must be rotated to appear upright.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    Deg0,
    /// Most common mounting; the model output is already upright.
    #[default]
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    /// All four orientations in ascending order.
    pub const ALL: [Orientation; 4] = [
        Orientation::Deg0,
        Orientation::Deg90,
        Orientation::Deg180,
        Orientation::Deg270,
    ];

    /// Parses a sensor angle in degrees.
    pub fn from_degrees(degrees: i32) -> DetPostResult<Self> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            _ => Err(DetPostError::InvalidOrientation { degrees }),
        }
    }

    /// Returns the angle in degrees.
    pub fn degrees(self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

impl TryFrom<i32> for Orientation {
    type Error = DetPostError;

    fn try_from(degrees: i32) -> DetPostResult<Self> {
        Self::from_degrees(degrees)
    }
}

/// Maps a box from the model-output frame into the canonical upright frame.
///
/// `width` and `height` are the model input extents.
#[inline]
pub fn remap_box(b: AnchorBox, orientation: Orientation, width: f32, height: f32) -> AnchorBox {
    match orientation {
        Orientation::Deg0 => AnchorBox::new(height - b.y1, b.x0, height - b.y0, b.x1),
        Orientation::Deg90 => b,
        Orientation::Deg180 => AnchorBox::new(b.y0, width - b.x1, b.y1, width - b.x0),
        Orientation::Deg270 => {
            AnchorBox::new(width - b.x1, height - b.y1, width - b.x0, height - b.y0)
        }
    }
}

/// Inverse of [`remap_box`]: maps an upright box back to the model-output frame.
#[inline]
pub fn inverse_remap_box(
    b: AnchorBox,
    orientation: Orientation,
    width: f32,
    height: f32,
) -> AnchorBox {
    match orientation {
        Orientation::Deg0 => AnchorBox::new(b.y0, height - b.x1, b.y1, height - b.x0),
        Orientation::Deg90 => b,
        Orientation::Deg180 => AnchorBox::new(width - b.y1, b.x0, width - b.y0, b.x1),
        // Point inversion is its own inverse.
        Orientation::Deg270 => remap_box(b, orientation, width, height),
    }
}
