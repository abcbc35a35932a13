#![cfg(feature = "rayon")]

use detpost::{
    ClassIndices, DetectConfig, Detector, Frame, ImageSize, LabelTable, ModelGeometry, NmsOrder,
    Orientation, RawOutputs,
};

const ANCHORS: usize = 64;

fn make_outputs(seed: usize) -> (Vec<f32>, Vec<f32>, Vec<u8>) {
    let mut boxes = Vec::with_capacity(ANCHORS * 4);
    let mut scores = Vec::with_capacity(ANCHORS);
    let mut classes = Vec::with_capacity(ANCHORS);
    for i in 0..ANCHORS {
        let v = (i * 37 + seed * 11) % 97;
        let x = (v % 13) as f32 * 20.0;
        let y = (v / 13) as f32 * 25.0;
        boxes.extend_from_slice(&[x, y, x + 30.0, y + 28.0]);
        scores.push(((i * 7 + seed * 3) % 10) as f32 / 10.0);
        classes.push((v % 5) as u8);
    }
    (boxes, scores, classes)
}

fn check(config: DetectConfig) {
    let geometry = ModelGeometry::new(320, 240, ANCHORS).unwrap();
    let labels = LabelTable::from_text("bg\na\nb\nc\nd").unwrap();
    let mut detector = Detector::new(geometry, labels).with_config(config).unwrap();

    let data: Vec<_> = (0..16).map(make_outputs).collect();
    let frames: Vec<Frame<'_>> = data
        .iter()
        .enumerate()
        .map(|(i, (boxes, scores, classes))| {
            let raw = RawOutputs::new(boxes, scores, ClassIndices::U8(classes)).unwrap();
            Frame::new(
                raw,
                Orientation::ALL[i % 4],
                ImageSize::new(640, 480).unwrap(),
            )
        })
        .collect();

    let parallel = detector.detect_batch(&frames).unwrap();
    assert_eq!(parallel.len(), frames.len());
    for (frame, got) in frames.iter().zip(&parallel) {
        let want = detector.detect(frame).unwrap();
        assert_eq!(got, &want);
    }
}

#[test]
fn batch_matches_sequential_anchor_order() {
    check(DetectConfig::default());
}

#[test]
fn batch_matches_sequential_score_order() {
    check(DetectConfig {
        nms_order: NmsOrder::ScoreDescending,
        iou_threshold: 0.4,
        ..DetectConfig::default()
    });
}
