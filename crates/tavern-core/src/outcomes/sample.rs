//! Weighted Sampling
//!
//! Weighted random choice over parallel outcome/weight sequences.

use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;
use thiserror::Error;

/// Errors from weighted sampling
#[derive(Debug, Error, PartialEq)]
pub enum SampleError {
    #[error("{outcomes} outcomes but {weights} weights")]
    LengthMismatch { outcomes: usize, weights: usize },

    #[error("invalid weights: {0}")]
    Weights(#[from] WeightedError),
}

/// Checks that a weight vector can be sampled from.
///
/// Weights must be finite, non-negative and not all zero. They need not sum
/// to one.
pub fn validate_weights(outcome_count: usize, weights: &[f64]) -> Result<(), SampleError> {
    if outcome_count != weights.len() {
        return Err(SampleError::LengthMismatch {
            outcomes: outcome_count,
            weights: weights.len(),
        });
    }
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(SampleError::Weights(WeightedError::InvalidWeight));
    }
    WeightedIndex::<f64>::new(weights)?;
    Ok(())
}

/// Draws one outcome, with probability proportional to its weight.
pub fn sample<'a, T, R>(rng: &mut R, outcomes: &'a [T], weights: &[f64]) -> Result<&'a T, SampleError>
where
    R: Rng + ?Sized,
{
    validate_weights(outcomes.len(), weights)?;
    let index = WeightedIndex::<f64>::new(weights)?;
    Ok(&outcomes[index.sample(rng)])
}
