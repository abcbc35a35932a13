//! Label ranking for single-vector classifier outputs.

use crate::candidate::topk::{RankScore, TopK};
use crate::output::labels::LabelTable;
use crate::trace::trace_event;

/// Classifier output vector in one of the supported dtypes.
#[derive(Clone, Copy, Debug)]
pub enum ClassScores<'a> {
    /// Float logits or probabilities.
    F32(&'a [f32]),
    /// Signed 8-bit quantized scores.
    I8(&'a [i8]),
    /// Unsigned 8-bit quantized scores.
    U8(&'a [u8]),
}

impl ClassScores<'_> {
    /// Number of classes.
    pub fn len(&self) -> usize {
        match self {
            Self::F32(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U8(v) => v.len(),
        }
    }

    /// Returns true if the vector is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One ranked class.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedLabel {
    /// Class index in the score vector.
    pub index: usize,
    /// Score widened to f32.
    pub score: f32,
    /// Label resolved modulo the label table length.
    pub label: String,
}

/// Ranks classes by score and names the best `top_k`.
pub struct Classifier {
    labels: LabelTable,
    top_k: usize,
}

impl Classifier {
    /// Default number of labels reported.
    pub const DEFAULT_TOP_K: usize = 3;

    /// Creates a classifier reporting [`Classifier::DEFAULT_TOP_K`] labels.
    pub fn new(labels: LabelTable) -> Self {
        Self {
            labels,
            top_k: Self::DEFAULT_TOP_K,
        }
    }

    /// Sets how many labels are reported.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Number of labels reported per call.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Returns the best classes, highest score first.
    pub fn classify(&self, scores: ClassScores<'_>) -> Vec<RankedLabel> {
        let ranked = match scores {
            ClassScores::F32(v) => self.rank(v, |s| s),
            ClassScores::I8(v) => self.rank(v, f32::from),
            ClassScores::U8(v) => self.rank(v, f32::from),
        };
        trace_event!("classify_done", classes = scores.len(), reported = ranked.len());
        ranked
    }

    /// Returns only the labels of the best classes, highest score first.
    pub fn top_labels(&self, scores: ClassScores<'_>) -> Vec<String> {
        self.classify(scores).into_iter().map(|r| r.label).collect()
    }

    fn rank<S: RankScore>(&self, scores: &[S], widen: impl Fn(S) -> f32) -> Vec<RankedLabel> {
        let mut topk = TopK::new(self.top_k.min(scores.len()));
        for (index, &score) in scores.iter().enumerate() {
            topk.push(index, score);
        }
        topk.into_sorted_desc()
            .into_iter()
            .map(|r| RankedLabel {
                index: r.index,
                score: widen(r.score),
                label: self.labels.get(r.index as i32).to_owned(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ClassScores, Classifier};
    use crate::output::labels::LabelTable;

    fn labels() -> LabelTable {
        LabelTable::from_text("tabby\ntiger\nlynx\nlion\npuma").unwrap()
    }

    #[test]
    fn float_scores_rank_top_three() {
        let clf = Classifier::new(labels());
        let scores = [0.05f32, 0.6, 0.1, 0.2, 0.05];
        assert_eq!(clf.top_labels(ClassScores::F32(&scores)), ["tiger", "lion", "lynx"]);
    }

    #[test]
    fn quantized_scores_use_same_ranking() {
        let clf = Classifier::new(labels()).with_top_k(2);
        let signed: [i8; 5] = [-100, 20, 90, -5, 0];
        let ranked = clf.classify(ClassScores::I8(&signed));
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].index, 2);
        assert_eq!(ranked[0].score, 90.0);
        assert_eq!(ranked[1].label, "tiger");

        let unsigned: [u8; 5] = [200, 20, 90, 5, 0];
        assert_eq!(clf.top_labels(ClassScores::U8(&unsigned)), ["tabby", "lynx"]);
    }

    #[test]
    fn short_vectors_return_everything() {
        let clf = Classifier::new(labels()).with_top_k(10);
        assert_eq!(clf.classify(ClassScores::F32(&[0.3, 0.7])).len(), 2);
        assert!(clf.classify(ClassScores::F32(&[])).is_empty());
    }
}
