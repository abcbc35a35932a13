//! Anchor selection and pruning.
//!
//! Includes confidence filtering, Top-K selection and greedy non-maximum
//! suppression.

pub mod filter;
pub mod nms;
pub mod topk;
