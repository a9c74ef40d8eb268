pub mod knn;
mod label;

pub use knn::KnnStore;
pub use label::{Classification, Confidences, Label, LabelCounts};

use async_trait::async_trait;

use crate::error::StoreError;

/// Fixed-length feature vector for one frame. Opaque to the control loops;
/// the only invariant is that the dimensionality matches across every stored
/// example and every query.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

/// Incrementally-trained classifier backend. Examples are append-only: the
/// core never removes one, and repeated training for a label is additive (it
/// deliberately biases later predictions toward that label).
#[async_trait]
pub trait ExampleStore: Send + Sync {
    async fn add_example(&self, embedding: Embedding, label: Label) -> Result<(), StoreError>;

    /// Classify a query embedding. Fails with [`StoreError::EmptyStore`]
    /// until at least one example has been added.
    async fn predict(&self, embedding: &Embedding) -> Result<Classification, StoreError>;

    async fn label_counts(&self) -> LabelCounts;
}
