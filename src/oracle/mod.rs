// src/oracle/mod.rs
//! Sentiment oracle abstraction.
//!
//! An oracle turns one piece of text into two independently sourced valence
//! estimates plus the share of neutral content. The journey engine only
//! aggregates what the oracle reports; it never inspects words itself.

pub mod lexicon;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub use lexicon::LexiconOracle;

/// Per-text oracle output. All fields are clamped into their ranges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSentiment {
    /// Aggregate valence in [-1, 1].
    pub compound: f64,
    /// Second valence estimate in [-1, 1].
    pub polarity: f64,
    /// Share of neutral content in [0, 1].
    pub neutral_fraction: f64,
}

impl RawSentiment {
    /// Safe constructor: rejects NaN/inf, clamps everything else.
    pub fn new(compound: f64, polarity: f64, neutral_fraction: f64) -> Result<Self, OracleError> {
        if !(compound.is_finite() && polarity.is_finite() && neutral_fraction.is_finite()) {
            return Err(OracleError::InvalidOutput(format!(
                "non-finite scores (compound={compound}, polarity={polarity}, neu={neutral_fraction})"
            )));
        }
        Ok(Self {
            compound: compound.clamp(-1.0, 1.0),
            polarity: polarity.clamp(-1.0, 1.0),
            neutral_fraction: neutral_fraction.clamp(0.0, 1.0),
        })
    }

    /// `0.7·compound + 0.3·polarity`, the blend used per sentence and per document.
    pub fn blended(&self) -> f64 {
        self.compound * 0.7 + self.polarity * 0.3
    }
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("sentiment oracle returned invalid output: {0}")]
    InvalidOutput(String),
    #[error("sentiment oracle unavailable: {0}")]
    Unavailable(String),
}

/// Scores text. Implementations must be callable once per utterance and
/// once for the whole document.
///
/// `rng` is the per-call generator seeded by the analyzer; oracles with a
/// randomized step must draw from it (and nothing else) to stay reproducible.
pub trait SentimentOracle: Send + Sync {
    fn score_text(&self, text: &str, rng: &mut StdRng) -> Result<RawSentiment, OracleError>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynOracle = Arc<dyn SentimentOracle>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_clamps_ranges() {
        let r = RawSentiment::new(1.7, -3.0, 1.2).unwrap();
        assert_eq!(r.compound, 1.0);
        assert_eq!(r.polarity, -1.0);
        assert_eq!(r.neutral_fraction, 1.0);
    }

    #[test]
    fn constructor_rejects_nan() {
        assert!(matches!(
            RawSentiment::new(f64::NAN, 0.0, 0.0),
            Err(OracleError::InvalidOutput(_))
        ));
    }

    #[test]
    fn blend_weights_compound_heavier() {
        let r = RawSentiment::new(0.5, -0.5, 0.0).unwrap();
        assert!((r.blended() - 0.2).abs() < 1e-12);
    }
}
