// src/journey/mod.rs
//! Emotional journey: per-sentence contextual scoring, labels, and the
//! aggregate trajectory summary.

pub mod aggregate;
pub mod context;
pub mod state;

use serde::{Deserialize, Serialize};

pub use aggregate::summarize;
pub use context::{ContextEntry, ContextWindow, ContextualScorer, CONTEXT_CAPACITY};
pub use state::{classify_document, classify_score, classify_sentence, EmotionalState};

/// A score with its label (journey start/end).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub score: f64,
    pub state: EmotionalState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// 0–100.
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalRange {
    pub min: f64,
    pub max: f64,
}

/// How sentiment evolves across one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySummary {
    pub start: ScorePoint,
    pub end: ScorePoint,
    pub fluctuation: f64,
    /// 0–100.
    pub stability: f64,
    pub trend: Trend,
    pub dominant_emotion: EmotionalState,
    pub emotional_range: EmotionalRange,
}

impl JourneySummary {
    /// Fixed journey for empty or single-sentence transcripts and for every
    /// error result.
    pub fn neutral() -> Self {
        let flat = ScorePoint {
            score: 0.0,
            state: EmotionalState::Neutral,
        };
        Self {
            start: flat,
            end: flat,
            fluctuation: 0.0,
            stability: 100.0,
            trend: Trend {
                direction: TrendDirection::Stable,
                strength: 0.0,
            },
            dominant_emotion: EmotionalState::Neutral,
            emotional_range: EmotionalRange { min: 0.0, max: 0.0 },
        }
    }
}

impl Default for JourneySummary {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn neutral_journey_wire_shape() {
        let v = serde_json::to_value(JourneySummary::neutral()).unwrap();
        assert_eq!(
            v,
            json!({
                "start": {"score": 0.0, "state": "neutral"},
                "end": {"score": 0.0, "state": "neutral"},
                "fluctuation": 0.0,
                "stability": 100.0,
                "trend": {"direction": "stable", "strength": 0.0},
                "dominant_emotion": "neutral",
                "emotional_range": {"min": 0.0, "max": 0.0}
            })
        );
    }
}
