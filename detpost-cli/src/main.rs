use clap::Parser;
use detpost::io::image_file_size;
use detpost::{
    ClassIndices, ClassScores, Classifier, DetectConfig, DetectionBox, Detector, Frame, ImageSize,
    LabelTable, ModelGeometry, NmsOrder, Orientation, RankedLabel, RawOutputs,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Detection postprocessing replay (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
enum NmsOrderConfig {
    #[default]
    AnchorIndex,
    ScoreDescending,
}

impl From<NmsOrderConfig> for NmsOrder {
    fn from(value: NmsOrderConfig) -> Self {
        match value {
            NmsOrderConfig::AnchorIndex => NmsOrder::AnchorIndex,
            NmsOrderConfig::ScoreDescending => NmsOrder::ScoreDescending,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelConfigJson {
    input_width: usize,
    input_height: usize,
    num_anchors: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectConfigJson {
    score_threshold: f32,
    iou_threshold: f32,
    max_outputs: usize,
    nms_order: NmsOrderConfig,
    skip_background_anchor: bool,
}

impl Default for DetectConfigJson {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            score_threshold: cfg.score_threshold,
            iou_threshold: cfg.iou_threshold,
            max_outputs: cfg.max_outputs,
            nms_order: NmsOrderConfig::AnchorIndex,
            skip_background_anchor: cfg.skip_background_anchor,
        }
    }
}

impl From<&DetectConfigJson> for DetectConfig {
    fn from(value: &DetectConfigJson) -> Self {
        Self {
            score_threshold: value.score_threshold,
            iou_threshold: value.iou_threshold,
            max_outputs: value.max_outputs,
            nms_order: value.nms_order.into(),
            skip_background_anchor: value.skip_background_anchor,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Config {
    frames_path: String,
    labels_path: String,
    #[serde(default)]
    output_path: Option<String>,
    model: ModelConfigJson,
    #[serde(default)]
    detect: DetectConfigJson,
    #[serde(default = "default_classify_top_k")]
    classify_top_k: usize,
    #[serde(default)]
    parallel: bool,
}

fn default_classify_top_k() -> usize {
    Classifier::DEFAULT_TOP_K
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ClassIndicesJson {
    U8(Vec<u8>),
    I32(Vec<i32>),
}

impl ClassIndicesJson {
    fn as_indices(&self) -> ClassIndices<'_> {
        match self {
            Self::U8(v) => ClassIndices::U8(v),
            Self::I32(v) => ClassIndices::I32(v),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ClassScoresJson {
    F32(Vec<f32>),
    I8(Vec<i8>),
    U8(Vec<u8>),
}

impl ClassScoresJson {
    fn as_scores(&self) -> ClassScores<'_> {
        match self {
            Self::F32(v) => ClassScores::F32(v),
            Self::I8(v) => ClassScores::I8(v),
            Self::U8(v) => ClassScores::U8(v),
        }
    }
}

/// One recorded detector invocation.
#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default = "default_orientation")]
    orientation_deg: i32,
    #[serde(default)]
    dest_width: Option<usize>,
    #[serde(default)]
    dest_height: Option<usize>,
    /// Takes the destination size from this image when width/height are absent.
    #[serde(default)]
    image_path: Option<String>,
    boxes: Vec<f32>,
    scores: Vec<f32>,
    class_indices: ClassIndicesJson,
    /// Optional classifier head output replayed alongside the detections.
    #[serde(default)]
    class_scores: Option<ClassScoresJson>,
}

fn default_orientation() -> i32 {
    Orientation::default().degrees()
}

impl FrameRecord {
    fn dest_size(&self) -> Result<ImageSize, Box<dyn std::error::Error>> {
        match (self.dest_width, self.dest_height, &self.image_path) {
            (Some(w), Some(h), _) => Ok(ImageSize::new(w, h)?),
            (_, _, Some(path)) => Ok(image_file_size(path)?),
            _ => Err("frame needs dest_width/dest_height or image_path".into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    confidence: f32,
    class_index: i32,
    label: String,
}

impl From<DetectionBox> for DetectionRecord {
    fn from(value: DetectionBox) -> Self {
        Self {
            left: value.left,
            top: value.top,
            right: value.right,
            bottom: value.bottom,
            confidence: value.confidence,
            class_index: value.class_index,
            label: value.label,
        }
    }
}

#[derive(Debug, Serialize)]
struct LabelRecord {
    index: usize,
    score: f32,
    label: String,
}

impl From<RankedLabel> for LabelRecord {
    fn from(value: RankedLabel) -> Self {
        Self {
            index: value.index,
            score: value.score,
            label: value.label,
        }
    }
}

#[derive(Debug, Serialize)]
struct FrameOutput {
    frame: usize,
    detections: Vec<DetectionRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    top_labels: Vec<LabelRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("detpost=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.frames_path.is_empty() || config.labels_path.is_empty() {
        return Err("frames_path and labels_path must be set in the config".into());
    }

    let labels = LabelTable::from_file(&config.labels_path)?;
    let geometry = ModelGeometry::new(
        config.model.input_width,
        config.model.input_height,
        config.model.num_anchors,
    )?;
    let mut detector =
        Detector::new(geometry, labels.clone()).with_config(DetectConfig::from(&config.detect))?;
    let classifier = Classifier::new(labels).with_top_k(config.classify_top_k);

    let frames_text = fs::read_to_string(&config.frames_path)?;
    let records: Vec<FrameRecord> = serde_json::from_str(&frames_text)?;

    let mut frames = Vec::with_capacity(records.len());
    for record in &records {
        let outputs = RawOutputs::new(
            &record.boxes,
            &record.scores,
            record.class_indices.as_indices(),
        )?;
        let orientation = Orientation::from_degrees(record.orientation_deg)?;
        frames.push(Frame::new(outputs, orientation, record.dest_size()?));
    }

    let detections = if config.parallel {
        detector.detect_batch(&frames)?
    } else {
        let mut all = Vec::with_capacity(frames.len());
        for frame in &frames {
            all.push(detector.detect(frame)?);
            let stats = detector.last_stats();
            tracing::debug!(
                candidates = stats.candidates,
                kept = stats.kept,
                emitted = stats.emitted,
                elapsed_us = stats.elapsed.as_micros() as u64,
                "frame_done"
            );
        }
        all
    };

    let output: Vec<FrameOutput> = records
        .iter()
        .zip(detections)
        .enumerate()
        .map(|(frame, (record, boxes))| FrameOutput {
            frame,
            detections: boxes.into_iter().map(DetectionRecord::from).collect(),
            top_labels: record
                .class_scores
                .as_ref()
                .map(|scores| {
                    classifier
                        .classify(scores.as_scores())
                        .into_iter()
                        .map(LabelRecord::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
