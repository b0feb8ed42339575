// src/journey/state.rs
//! Discrete emotional labels and the score → label classifiers.
//!
//! Bands are inclusive and checked positive-first, then negative, then the
//! neutral fallback. The two call sites differ only in that fallback:
//! sentences use `factual`/`neutral`, the whole document `neutral`/`mixed`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Share of neutral content above which a near-zero score counts as
/// content-free rather than ambivalent.
pub const NEUTRAL_FRACTION_CUTOFF: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionalState {
    #[serde(rename = "extremely positive")]
    ExtremelyPositive,
    #[serde(rename = "very positive")]
    VeryPositive,
    #[serde(rename = "moderately positive")]
    ModeratelyPositive,
    #[serde(rename = "slightly positive")]
    SlightlyPositive,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "factual")]
    Factual,
    #[serde(rename = "mixed")]
    Mixed,
    #[serde(rename = "slightly negative")]
    SlightlyNegative,
    #[serde(rename = "moderately negative")]
    ModeratelyNegative,
    #[serde(rename = "very negative")]
    VeryNegative,
    #[serde(rename = "extremely negative")]
    ExtremelyNegative,
}

impl EmotionalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionalState::ExtremelyPositive => "extremely positive",
            EmotionalState::VeryPositive => "very positive",
            EmotionalState::ModeratelyPositive => "moderately positive",
            EmotionalState::SlightlyPositive => "slightly positive",
            EmotionalState::Neutral => "neutral",
            EmotionalState::Factual => "factual",
            EmotionalState::Mixed => "mixed",
            EmotionalState::SlightlyNegative => "slightly negative",
            EmotionalState::ModeratelyNegative => "moderately negative",
            EmotionalState::VeryNegative => "very negative",
            EmotionalState::ExtremelyNegative => "extremely negative",
        }
    }

    /// Any of the four positive bands.
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            EmotionalState::ExtremelyPositive
                | EmotionalState::VeryPositive
                | EmotionalState::ModeratelyPositive
                | EmotionalState::SlightlyPositive
        )
    }

    /// Any of the four negative bands.
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            EmotionalState::ExtremelyNegative
                | EmotionalState::VeryNegative
                | EmotionalState::ModeratelyNegative
                | EmotionalState::SlightlyNegative
        )
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polar bands only; `None` inside (-0.1, 0.1).
fn polar_band(score: f64) -> Option<EmotionalState> {
    use EmotionalState::*;
    let state = if score >= 0.75 {
        ExtremelyPositive
    } else if score >= 0.5 {
        VeryPositive
    } else if score >= 0.25 {
        ModeratelyPositive
    } else if score >= 0.1 {
        SlightlyPositive
    } else if score <= -0.75 {
        ExtremelyNegative
    } else if score <= -0.5 {
        VeryNegative
    } else if score <= -0.25 {
        ModeratelyNegative
    } else if score <= -0.1 {
        SlightlyNegative
    } else {
        return None;
    };
    Some(state)
}

/// Per-sentence label. Near-zero scores become `factual` when the oracle
/// saw mostly neutral content, else `neutral`.
pub fn classify_sentence(score: f64, neutral_fraction: Option<f64>) -> EmotionalState {
    polar_band(score).unwrap_or(match neutral_fraction {
        Some(neu) if neu > NEUTRAL_FRACTION_CUTOFF => EmotionalState::Factual,
        _ => EmotionalState::Neutral,
    })
}

/// Label for a bare score (journey start/end).
pub fn classify_score(score: f64) -> EmotionalState {
    classify_sentence(score, None)
}

/// Document-level label. Near-zero scores become `neutral` when the text is
/// mostly neutral content, else `mixed`.
pub fn classify_document(score: f64, neutral_fraction: f64) -> EmotionalState {
    polar_band(score).unwrap_or(if neutral_fraction > NEUTRAL_FRACTION_CUTOFF {
        EmotionalState::Neutral
    } else {
        EmotionalState::Mixed
    })
}
