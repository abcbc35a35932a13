//! Class label lookup.

use crate::util::{DetPostError, DetPostResult};
use std::path::Path;
use std::sync::Arc;

/// Non-empty, cheaply cloneable table of class names.
///
/// Lookups wrap the class index around the table length, so models with more
/// classes than labels (or garbage indices) still resolve to some label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelTable {
    labels: Arc<[String]>,
}

impl LabelTable {
    /// Creates a table from owned labels.
    pub fn new(labels: Vec<String>) -> DetPostResult<Self> {
        if labels.is_empty() {
            return Err(DetPostError::EmptyLabelTable);
        }
        Ok(Self {
            labels: labels.into(),
        })
    }

    /// Parses one label per line. Blank lines are kept as empty labels so
    /// line numbers stay aligned with class indices.
    pub fn from_text(text: &str) -> DetPostResult<Self> {
        Self::new(text.lines().map(str::to_owned).collect())
    }

    /// Reads a labels file with one label per line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DetPostResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|err| DetPostError::Io {
            reason: format!("{}: {err}", path.as_ref().display()),
        })?;
        Self::from_text(&text)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Resolves `class_index` modulo the table length.
    pub fn get(&self, class_index: i32) -> &str {
        let len = self.labels.len() as i64;
        let slot = i64::from(class_index).rem_euclid(len) as usize;
        &self.labels[slot]
    }

    /// Iterates over the labels in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }
}
