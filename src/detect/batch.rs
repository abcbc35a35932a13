//! Rayon-parallel postprocessing of recorded frames (feature-gated).
//!
//! Frames are independent, so each rayon worker gets its own scratch
//! buffers and the detector itself is only read.

use super::scratch::{postprocess_frame, Scratch};
use super::{Detector, Frame};
use crate::output::rescale::DetectionBox;
use crate::trace::{trace_event, trace_span};
use crate::util::DetPostResult;
use rayon::prelude::*;

impl Detector {
    /// Postprocesses many frames in parallel; results keep the input order.
    pub fn detect_batch(&self, frames: &[Frame<'_>]) -> DetPostResult<Vec<Vec<DetectionBox>>> {
        let _span = trace_span!("detect_batch", frames = frames.len(), parallel = true).entered();

        let anchors = self.geometry.num_anchors();
        let max_outputs = self.config.max_outputs;
        let results: DetPostResult<Vec<Vec<DetectionBox>>> = frames
            .par_iter()
            .map_init(
                || Scratch::new(anchors, max_outputs),
                |scratch, frame| {
                    let mut out = Vec::new();
                    postprocess_frame(
                        &self.geometry,
                        &self.config,
                        &self.labels,
                        scratch,
                        frame,
                        &mut out,
                    )?;
                    Ok(out)
                },
            )
            .collect();

        if let Ok(batches) = &results {
            let total: usize = batches.iter().map(Vec::len).sum();
            trace_event!("detect_batch_done", detections = total);
        }
        results
    }
}
