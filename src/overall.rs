// src/overall.rs
//! Document-level sentiment and the confidence of the overall verdict.
//!
//! Confidence blends how much the two oracle estimates agree with how
//! coherent the journey's opening and closing are:
//! `(agreement·0.6 + coherence·0.4)·100`, clamped to [0, 100].

use crate::journey::aggregate::round3;
use crate::journey::{classify_document, EmotionalState};
use crate::oracle::RawSentiment;

/// Label and score for the whole text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallSentiment {
    pub sentiment: EmotionalState,
    /// `(0.7·compound + 0.3·polarity)·100`, 3 decimals.
    pub score: f64,
}

pub fn document_score(raw: &RawSentiment) -> f64 {
    round3(raw.blended() * 100.0)
}

pub fn overall_sentiment(raw: &RawSentiment) -> OverallSentiment {
    OverallSentiment {
        sentiment: classify_document(raw.compound, raw.neutral_fraction),
        score: document_score(raw),
    }
}

/// `1 − |compound − polarity|`, in [0, 1] for in-range inputs.
pub fn agreement(raw: &RawSentiment) -> f64 {
    (1.0 - (raw.compound - raw.polarity).abs()).clamp(0.0, 1.0)
}

/// `1 − |start − end| / 2`, in [0, 1] for in-range inputs.
pub fn emotional_coherence(start: f64, end: f64) -> f64 {
    (1.0 - (start - end).abs() / 2.0).clamp(0.0, 1.0)
}

/// Confidence in [0, 100], 3 decimals.
pub fn confidence(raw: &RawSentiment, journey_start: f64, journey_end: f64) -> f64 {
    let c = (agreement(raw) * 0.6 + emotional_coherence(journey_start, journey_end) * 0.4) * 100.0;
    round3(c.clamp(0.0, 100.0))
}
