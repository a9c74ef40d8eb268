use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;

use super::{Classification, Confidences, Embedding, ExampleStore, Label, LabelCounts};

pub const DEFAULT_K: usize = 3;

/// In-memory nearest-neighbor store. Cosine similarity over the stored
/// examples, majority vote over the k nearest; confidences are the vote
/// fraction each label received among those k. Append-only by construction:
/// there is no removal path.
pub struct KnnStore {
    k: usize,
    inner: Arc<RwLock<Vec<(Embedding, Label)>>>,
}

impl KnnStore {
    pub fn new() -> Self {
        Self::with_k(DEFAULT_K)
    }

    pub fn with_k(k: usize) -> Self {
        Self {
            k: k.max(1),
            inner: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for KnnStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExampleStore for KnnStore {
    async fn add_example(&self, embedding: Embedding, label: Label) -> Result<(), StoreError> {
        let mut examples = self.inner.write().await;
        if let Some((first, _)) = examples.first() {
            if first.dim() != embedding.dim() {
                return Err(StoreError::DimensionMismatch {
                    expected: first.dim(),
                    got: embedding.dim(),
                });
            }
        }
        examples.push((embedding, label));
        Ok(())
    }

    async fn predict(&self, embedding: &Embedding) -> Result<Classification, StoreError> {
        let examples = self.inner.read().await;
        let Some((first, _)) = examples.first() else {
            return Err(StoreError::EmptyStore);
        };
        if first.dim() != embedding.dim() {
            return Err(StoreError::DimensionMismatch {
                expected: first.dim(),
                got: embedding.dim(),
            });
        }

        let mut scored: Vec<(f32, Label)> = examples
            .iter()
            .map(|(stored, label)| (cosine_similarity(stored.as_slice(), embedding.as_slice()), *label))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let k = self.k.min(scored.len());
        let neighbors = &scored[..k];

        let mut votes = [0usize; 2];
        let mut similarity_sums = [0.0f32; 2];
        for (similarity, label) in neighbors {
            let idx = *label as usize;
            votes[idx] += 1;
            similarity_sums[idx] += similarity;
        }

        // Ties go to the label whose voting neighbors are collectively
        // closer, which is deterministic and favors the tighter cluster.
        let winner = if votes[Label::Touched as usize] > votes[Label::NotTouched as usize] {
            Label::Touched
        } else if votes[Label::Touched as usize] < votes[Label::NotTouched as usize] {
            Label::NotTouched
        } else if similarity_sums[Label::Touched as usize]
            > similarity_sums[Label::NotTouched as usize]
        {
            Label::Touched
        } else {
            Label::NotTouched
        };

        let confidences = Confidences {
            not_touched: votes[Label::NotTouched as usize] as f32 / k as f32,
            touched: votes[Label::Touched as usize] as f32 / k as f32,
        };

        Ok(Classification {
            label: winner,
            confidences,
        })
    }

    async fn label_counts(&self) -> LabelCounts {
        let examples = self.inner.read().await;
        let mut counts = LabelCounts::default();
        for (_, label) in examples.iter() {
            match label {
                Label::NotTouched => counts.not_touched += 1,
                Label::Touched => counts.touched += 1,
            }
        }
        counts
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
