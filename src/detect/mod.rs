//! Per-frame detection postprocessing.
//!
//! A [`Detector`] owns the scratch buffers for one video stream. Each call to
//! [`Detector::detect`] runs the stages in a fixed order:
//!
//! 1. mark anchors whose score reaches `score_threshold` as valid,
//! 2. remap valid boxes into the upright frame for the sensor orientation,
//! 3. greedy NMS keeps at most `max_outputs` boxes,
//! 4. survivors are scaled to the destination image and labeled.
//!
//! The detector borrows itself mutably per frame; use one detector per
//! worker thread.

#[cfg(feature = "rayon")]
mod batch;
mod scratch;

use crate::candidate::nms::NmsOrder;
use crate::geometry::orientation::Orientation;
use crate::geometry::ImageSize;
use crate::output::labels::LabelTable;
use crate::output::rescale::DetectionBox;
use crate::tensor::RawOutputs;
use crate::trace::trace_setup;
use crate::util::{DetPostError, DetPostResult};
use scratch::{postprocess_frame, Scratch};
use std::time::Duration;

/// Thresholds and limits for detection postprocessing.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectConfig {
    /// Minimum confidence for an anchor to be considered.
    pub score_threshold: f32,
    /// IoU above which a later box is suppressed.
    pub iou_threshold: f32,
    /// Maximum number of boxes kept by NMS.
    pub max_outputs: usize,
    /// Visiting order of the suppression sweep.
    pub nms_order: NmsOrder,
    /// Drop anchor 0, which the supported detectors use as padding.
    pub skip_background_anchor: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.2,
            iou_threshold: 0.2,
            max_outputs: 20,
            nms_order: NmsOrder::AnchorIndex,
            skip_background_anchor: true,
        }
    }
}

impl DetectConfig {
    /// Checks that thresholds are usable.
    pub fn validate(&self) -> DetPostResult<()> {
        if !self.score_threshold.is_finite() {
            return Err(DetPostError::InvalidParameter {
                name: "score_threshold",
                reason: "must be finite",
            });
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(DetPostError::InvalidParameter {
                name: "iou_threshold",
                reason: "must lie in [0, 1]",
            });
        }
        Ok(())
    }
}

/// Fixed model properties, known once the model is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelGeometry {
    input: ImageSize,
    num_anchors: usize,
}

impl ModelGeometry {
    /// Describes a model with the given input size and anchor count.
    pub fn new(input_width: usize, input_height: usize, num_anchors: usize) -> DetPostResult<Self> {
        let input = ImageSize::new(input_width, input_height)?;
        if num_anchors == 0 {
            return Err(DetPostError::InvalidParameter {
                name: "num_anchors",
                reason: "must be > 0",
            });
        }
        Ok(Self { input, num_anchors })
    }

    /// Model input size in pixels.
    pub fn input(&self) -> ImageSize {
        self.input
    }

    /// Number of anchors per frame.
    pub fn num_anchors(&self) -> usize {
        self.num_anchors
    }
}

/// One frame of detector output plus the context needed to place it.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// Raw output tensors.
    pub outputs: RawOutputs<'a>,
    /// Sensor orientation the frame was captured at.
    pub orientation: Orientation,
    /// Size of the image the detections are drawn onto.
    pub dest: ImageSize,
}

impl<'a> Frame<'a> {
    /// Bundles outputs with orientation and destination size.
    pub fn new(outputs: RawOutputs<'a>, orientation: Orientation, dest: ImageSize) -> Self {
        Self {
            outputs,
            orientation,
            dest,
        }
    }
}

/// Counters and timing for the most recent frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PostprocessStats {
    /// Wall time spent in postprocessing.
    pub elapsed: Duration,
    /// Anchors in the frame.
    pub anchors: usize,
    /// Anchors passing the score threshold.
    pub candidates: usize,
    /// Anchors kept by NMS.
    pub kept: usize,
    /// Detections handed to the caller.
    pub emitted: usize,
}

/// Detection postprocessor for one stream.
pub struct Detector {
    geometry: ModelGeometry,
    config: DetectConfig,
    labels: LabelTable,
    scratch: Scratch,
    last_stats: PostprocessStats,
}

impl Detector {
    /// Creates a detector with the default configuration.
    pub fn new(geometry: ModelGeometry, labels: LabelTable) -> Self {
        let config = DetectConfig::default();
        trace_setup!(
            "detector_ready",
            anchors = geometry.num_anchors(),
            input_width = geometry.input().width,
            input_height = geometry.input().height,
            labels = labels.len()
        );
        Self {
            scratch: Scratch::new(geometry.num_anchors(), config.max_outputs),
            geometry,
            config,
            labels,
            last_stats: PostprocessStats::default(),
        }
    }

    /// Replaces the configuration after validating it.
    pub fn with_config(mut self, config: DetectConfig) -> DetPostResult<Self> {
        config.validate()?;
        self.scratch = Scratch::new(self.geometry.num_anchors(), config.max_outputs);
        self.config = config;
        Ok(self)
    }

    /// Model geometry the detector was built for.
    pub fn geometry(&self) -> &ModelGeometry {
        &self.geometry
    }

    /// Active configuration.
    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// Label table used to name detections.
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Postprocesses one frame into labeled image-space detections.
    pub fn detect(&mut self, frame: &Frame<'_>) -> DetPostResult<Vec<DetectionBox>> {
        let mut out = Vec::with_capacity(self.config.max_outputs.min(self.geometry.num_anchors()));
        self.detect_into(frame, &mut out)?;
        Ok(out)
    }

    /// Like [`Detector::detect`] but fills a caller-owned vector, cleared first.
    pub fn detect_into(
        &mut self,
        frame: &Frame<'_>,
        out: &mut Vec<DetectionBox>,
    ) -> DetPostResult<()> {
        out.clear();
        self.last_stats = postprocess_frame(
            &self.geometry,
            &self.config,
            &self.labels,
            &mut self.scratch,
            frame,
            out,
        )?;
        Ok(())
    }

    /// Anchor indices kept by NMS in the most recent frame, before the
    /// background slot is dropped.
    pub fn surviving_indices(&self) -> &[usize] {
        &self.scratch.keep
    }

    /// Counters and timing of the most recent frame.
    pub fn last_stats(&self) -> PostprocessStats {
        self.last_stats
    }
}

#[cfg(test)]
mod tests {
    use super::{DetectConfig, Detector, Frame, ModelGeometry};
    use crate::geometry::orientation::Orientation;
    use crate::geometry::ImageSize;
    use crate::output::labels::LabelTable;
    use crate::tensor::{ClassIndices, RawOutputs};
    use crate::util::DetPostError;

    #[test]
    fn config_rejects_out_of_range_iou() {
        let cfg = DetectConfig {
            iou_threshold: 1.5,
            ..DetectConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(DetectConfig::default().validate().is_ok());
    }

    #[test]
    fn geometry_rejects_zero_anchors() {
        assert!(ModelGeometry::new(64, 64, 0).is_err());
        assert!(ModelGeometry::new(0, 64, 4).is_err());
    }

    #[test]
    fn frame_with_wrong_anchor_count_is_rejected() {
        let geometry = ModelGeometry::new(32, 32, 3).unwrap();
        let labels = LabelTable::from_text("x").unwrap();
        let mut detector = Detector::new(geometry, labels);
        let raw = RawOutputs::new(&[0.0; 8], &[0.5; 2], ClassIndices::U8(&[0, 0])).unwrap();
        let frame = Frame::new(raw, Orientation::Deg90, ImageSize::new(32, 32).unwrap());
        assert_eq!(
            detector.detect(&frame).err(),
            Some(DetPostError::AnchorCountMismatch {
                expected: 3,
                got: 2,
            })
        );
    }

    #[test]
    fn stats_track_last_frame() {
        let geometry = ModelGeometry::new(32, 32, 3).unwrap();
        let labels = LabelTable::from_text("bg\nobj").unwrap();
        let mut detector = Detector::new(geometry, labels);
        let boxes = [
            0.0, 0.0, 1.0, 1.0, //
            2.0, 2.0, 10.0, 10.0, //
            20.0, 20.0, 30.0, 30.0,
        ];
        let scores = [0.9, 0.8, 0.1];
        let raw = RawOutputs::new(&boxes, &scores, ClassIndices::I32(&[0, 1, 1])).unwrap();
        let frame = Frame::new(raw, Orientation::Deg90, ImageSize::new(32, 32).unwrap());
        let out = detector.detect(&frame).unwrap();

        let stats = detector.last_stats();
        assert_eq!(stats.anchors, 3);
        assert_eq!(stats.candidates, 2);
        assert_eq!(stats.kept, 2);
        assert_eq!(stats.emitted, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(detector.surviving_indices(), &[0, 1]);
    }
}
