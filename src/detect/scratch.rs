//! Per-stream scratch buffers and the single-frame postprocessing pass.

use crate::candidate::filter::mark_valid;
use crate::candidate::nms::{greedy_nms, score_order_nms, NmsOrder};
use crate::detect::{DetectConfig, Frame, ModelGeometry, PostprocessStats};
use crate::geometry::orientation::remap_box;
use crate::geometry::BoxColumns;
use crate::output::labels::LabelTable;
use crate::output::rescale::{rescale_detections, DetectionBox};
use crate::trace::{trace_event, trace_span};
use crate::util::{DetPostError, DetPostResult};
use std::time::Instant;

/// Buffers reused across frames, sized once from the anchor count.
#[derive(Clone, Debug)]
pub(crate) struct Scratch {
    pub(crate) boxes: BoxColumns,
    pub(crate) valid: Vec<bool>,
    pub(crate) keep: Vec<usize>,
    pub(crate) order: Vec<usize>,
}

impl Scratch {
    pub(crate) fn new(num_anchors: usize, max_outputs: usize) -> Self {
        Self {
            boxes: BoxColumns::with_len(num_anchors),
            valid: vec![false; num_anchors],
            keep: Vec::with_capacity(max_outputs.min(num_anchors)),
            order: Vec::with_capacity(num_anchors),
        }
    }
}

/// Runs filter, remap, NMS and rescale for one frame, appending to `out`.
pub(crate) fn postprocess_frame(
    geometry: &ModelGeometry,
    cfg: &DetectConfig,
    labels: &LabelTable,
    scratch: &mut Scratch,
    frame: &Frame<'_>,
    out: &mut Vec<DetectionBox>,
) -> DetPostResult<PostprocessStats> {
    let start = Instant::now();
    let raw = &frame.outputs;
    let anchors = raw.num_anchors();
    if anchors != geometry.num_anchors() {
        return Err(DetPostError::AnchorCountMismatch {
            expected: geometry.num_anchors(),
            got: anchors,
        });
    }

    let _span = trace_span!(
        "postprocess",
        anchors = anchors,
        orientation = frame.orientation.degrees()
    )
    .entered();

    let candidates = mark_valid(raw.scores(), cfg.score_threshold, &mut scratch.valid);

    let input = geometry.input();
    let (width, height) = (input.width as f32, input.height as f32);
    for idx in 0..anchors {
        if scratch.valid[idx] {
            let upright = remap_box(raw.anchor_box(idx), frame.orientation, width, height);
            scratch.boxes.set(idx, upright);
        }
    }

    match cfg.nms_order {
        NmsOrder::AnchorIndex => greedy_nms(
            &scratch.boxes,
            &mut scratch.valid,
            cfg.max_outputs,
            cfg.iou_threshold,
            &mut scratch.keep,
        ),
        NmsOrder::ScoreDescending => score_order_nms(
            &scratch.boxes,
            raw.scores(),
            &mut scratch.valid,
            cfg.max_outputs,
            cfg.iou_threshold,
            &mut scratch.order,
            &mut scratch.keep,
        ),
    }

    let emitted = rescale_detections(
        &scratch.keep,
        &scratch.boxes,
        raw,
        input,
        frame.dest,
        labels,
        cfg.skip_background_anchor,
        out,
    );

    let stats = PostprocessStats {
        elapsed: start.elapsed(),
        anchors,
        candidates,
        kept: scratch.keep.len(),
        emitted,
    };
    trace_event!(
        "postprocess_done",
        candidates = stats.candidates,
        kept = stats.kept,
        emitted = stats.emitted,
        elapsed_us = stats.elapsed.as_micros() as u64
    );
    Ok(stats)
}
