//! Flat inner-product similarity index.
//!
//! Stores fixed-dimension vectors row-major in a single buffer and
//! answers top-k queries by exact brute-force scoring. Vectors are
//! L2-normalized on insertion and queries are normalized before
//! scoring, so the inner product equals cosine similarity.

use serde::{Deserialize, Serialize};

use crate::core::error::{DocQaError, Result};

/// Exact inner-product index over unit-norm vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    dim: usize,
    data: Vec<f32>,
}

impl VectorIndex {
    /// Create an empty index for `dim`-dimensional vectors.
    ///
    /// # Panics
    ///
    /// Panics if `dim` is 0.
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0, "dim must be > 0");

        Self {
            dim,
            data: Vec::new(),
        }
    }

    /// Vector dimensionality
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the stored vector at `index`
    pub fn vector(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dim)?;
        self.data.get(start..start + self.dim)
    }

    /// Append vectors in input order, normalizing each to unit
    /// Euclidean norm before storage.
    ///
    /// Fails with a dimension mismatch if any vector's width differs
    /// from the index dimensionality; nothing is appended in that
    /// case.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        for vector in vectors {
            if vector.len() != self.dim {
                return Err(DocQaError::DimensionMismatch {
                    expected: self.dim,
                    actual: vector.len(),
                });
            }
        }

        for vector in vectors {
            let mut row = vector.clone();
            normalize_l2(&mut row);
            self.data.extend_from_slice(&row);
        }
        Ok(())
    }

    /// Return up to `top_k` `(index, score)` pairs in descending
    /// score order.
    ///
    /// The sort is stable, so equal scores resolve to insertion
    /// order. Fewer than `top_k` pairs are returned when the index
    /// holds fewer entries.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dim {
            return Err(DocQaError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let mut normalized = query.to_vec();
        normalize_l2(&mut normalized);

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(index, row)| (index, dot(row, &normalized)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

/// Rescale a vector to unit Euclidean norm in place.
///
/// Zero vectors are left unchanged.
pub fn normalize_l2(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
