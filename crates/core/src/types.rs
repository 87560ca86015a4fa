//! Probability distributions used by stochastic selection.
//!
//! `Policy` enforces its invariant at construction: all values are
//! non-negative and sum to 1.0 (±1e-9).

use crate::{Result, SpireError};
use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};

/// Tolerance for policy sum validation.
const POLICY_SUM_TOLERANCE: f64 = 1e-9;

/// A probability distribution over candidate indices.
///
/// # Example
/// ```
/// use spire_core::Policy;
///
/// let policy = Policy::softmax(&[1.0, 2.0, 3.0], 1.0).unwrap();
/// assert!((policy.sum() - 1.0).abs() < 1e-9);
/// assert_eq!(policy.argmax(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Policy(Vec<f64>);

impl Policy {
    /// Create a policy from an explicit probability distribution.
    ///
    /// # Errors
    /// Returns `SpireError::InvalidPolicy` if the vector is empty, contains
    /// negative or non-finite values, or does not sum to 1.0.
    pub fn new(probs: Vec<f64>) -> Result<Self> {
        if probs.is_empty() {
            return Err(SpireError::InvalidPolicy(
                "policy cannot be empty".to_string(),
            ));
        }

        if probs.iter().any(|&p| !p.is_finite() || p < 0.0) {
            return Err(SpireError::InvalidPolicy(
                "policy contains negative or non-finite values".to_string(),
            ));
        }

        let sum: f64 = probs.iter().sum();
        if (sum - 1.0).abs() > POLICY_SUM_TOLERANCE {
            return Err(SpireError::InvalidPolicy(format!(
                "policy sum {} is not 1.0 (tolerance {})",
                sum, POLICY_SUM_TOLERANCE
            )));
        }

        Ok(Self(probs))
    }

    /// Softmax over `scores` at the given temperature.
    ///
    /// The maximum score is subtracted before exponentiating, so the largest
    /// term is always `exp(0) = 1` and the normaliser can never be zero.
    ///
    /// # Errors
    /// Returns an error if `scores` is empty or contains non-finite values,
    /// or if `temperature` is not a positive finite number.
    pub fn softmax(scores: &[f64], temperature: f64) -> Result<Self> {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(SpireError::InvalidTemperature(temperature));
        }
        if scores.is_empty() {
            return Err(SpireError::InvalidPolicy(
                "cannot take softmax of zero scores".to_string(),
            ));
        }
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(SpireError::InvalidPolicy(
                "scores must be finite".to_string(),
            ));
        }

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores
            .iter()
            .map(|&s| ((s - max) / temperature).exp())
            .collect();
        let total: f64 = exps.iter().sum();

        Ok(Self(exps.into_iter().map(|e| e / total).collect()))
    }

    /// Create a uniform policy over the given number of candidates.
    ///
    /// # Errors
    /// Returns error if `len` is zero.
    pub fn uniform(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(SpireError::InvalidPolicy(
                "cannot create uniform policy over 0 candidates".to_string(),
            ));
        }
        Ok(Self(vec![1.0 / len as f64; len]))
    }

    /// Draw an index with probability proportional to its weight.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        if self.0.len() == 1 {
            return 0;
        }
        match WeightedIndex::new(&self.0) {
            Ok(dist) => dist.sample(rng),
            // Unreachable for a validated policy; fall back to the mode.
            Err(_) => self.argmax(),
        }
    }

    /// Get the probability at the given index.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Index of the most probable candidate (first one on ties).
    pub fn argmax(&self) -> usize {
        argmax(&self.0)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Index of the largest value, first one on ties. Returns 0 for an empty slice.
///
/// NaN never compares greater, so it is only picked when it comes first.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

impl std::ops::Index<usize> for Policy {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}
