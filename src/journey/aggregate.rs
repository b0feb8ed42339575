// src/journey/aggregate.rs
//! # Journey Aggregator
//! Pure functions over the full ordered sequence of smoothed scores.
//! No I/O, suitable for unit tests and offline evaluation.

use std::collections::HashMap;

use super::state::{classify_score, EmotionalState};
use super::{EmotionalRange, JourneySummary, ScorePoint, Trend, TrendDirection};

/// Base weights for the three sentences nearest to an edge, nearest first.
const EDGE_WEIGHTS: [f64; 3] = [0.6, 0.3, 0.1];

/// Share below which no label can be called dominant in a 3+ label mix.
const MIXED_MAX_SHARE: f64 = 0.4;

pub(crate) fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

/// Population variance.
pub(crate) fn variance(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let m = mean(xs);
    xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64
}

/// Population standard deviation.
pub(crate) fn std_dev(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}

fn min_max(xs: &[f64]) -> (f64, f64) {
    xs.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
        (lo.min(x), hi.max(x))
    })
}

/// Intensity-weighted edge weights, normalized to sum to 1.
/// `nearest_first` is ordered from the edge inwards.
fn edge_weights<'a>(nearest_first: impl Iterator<Item = &'a f64>) -> Vec<f64> {
    let raw: Vec<f64> = nearest_first
        .zip(EDGE_WEIGHTS)
        .map(|(s, base)| base * (1.0 + s.abs() * 0.5))
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Weighted opening sentiment over the first ≤3 scores.
pub fn start_score(scores: &[f64]) -> f64 {
    let head = &scores[..scores.len().min(3)];
    if head.is_empty() {
        return 0.0;
    }
    let weights = edge_weights(head.iter());
    head.iter().zip(weights).map(|(s, w)| s * w).sum()
}

/// Weighted closing sentiment over the last ≤3 scores; the final sentence
/// carries the largest base weight.
pub fn end_score(scores: &[f64]) -> f64 {
    let tail = &scores[scores.len().saturating_sub(3)..];
    if tail.is_empty() {
        return 0.0;
    }
    let mut weights = edge_weights(tail.iter().rev());
    // back to chronological order
    weights.reverse();
    tail.iter().zip(weights).map(|(s, w)| s * w).sum()
}

/// `0.7·stddev + 0.3·(max − min)`.
pub fn fluctuation(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    let (lo, hi) = min_max(scores);
    std_dev(scores) * 0.7 + (hi - lo) * 0.3
}

/// Stability in [0, 1]: penalizes variance and the mean absolute step.
pub fn stability(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 1.0;
    }
    let steps: Vec<f64> = scores.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let rate_of_change = mean(&steps);
    (1.0 - (variance(scores) * 0.5 + rate_of_change * 0.5)).clamp(0.0, 1.0)
}

/// Compare the opening and closing means against a noise threshold that
/// grows with the overall spread.
pub fn trend_direction(scores: &[f64]) -> TrendDirection {
    if scores.len() < 2 {
        return TrendDirection::Stable;
    }
    let window = scores.len().min(3);
    let start_avg = mean(&scores[..window]);
    let end_avg = mean(&scores[scores.len() - window..]);
    let threshold = 0.1 * std_dev(scores) + 0.05;

    let diff = end_avg - start_avg;
    if diff.abs() < threshold {
        TrendDirection::Stable
    } else if diff > 0.0 {
        TrendDirection::Improving
    } else {
        TrendDirection::Declining
    }
}

/// Least-squares slope of `(index, score)`.
pub fn ols_slope(scores: &[f64]) -> f64 {
    let n = scores.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(scores);
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, y) in scores.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    if sxx == 0.0 {
        0.0
    } else {
        sxy / sxx
    }
}

/// Trend strength in [0, 1]: `|tanh(3·slope)|`.
pub fn trend_strength(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    (ols_slope(scores) * 3.0).tanh().abs()
}

/// Frequency/intensity vote over the observed labels.
///
/// Each label gets `0.6·share_of_sentences + 0.4·share_of_total_|score|`;
/// ties go to the label seen first. With more than two labels and none
/// covering 40% of sentences the result is `mixed`.
pub fn dominant_emotion(states: &[EmotionalState], scores: &[f64]) -> EmotionalState {
    let n = states.len().min(scores.len());
    if n == 0 {
        return EmotionalState::Neutral;
    }
    let (states, scores) = (&states[..n], &scores[..n]);

    // first-seen order keeps tie-breaking deterministic
    let mut order: Vec<EmotionalState> = Vec::new();
    let mut counts: HashMap<EmotionalState, usize> = HashMap::new();
    let mut intensity: HashMap<EmotionalState, f64> = HashMap::new();
    for (state, score) in states.iter().zip(scores) {
        let c = counts.entry(*state).or_insert(0);
        if *c == 0 {
            order.push(*state);
        }
        *c += 1;
        *intensity.entry(*state).or_insert(0.0) += score.abs();
    }

    let total_intensity: f64 = scores.iter().map(|s| s.abs()).sum();
    let mut best: Option<(EmotionalState, f64)> = None;
    for state in &order {
        let frequency = counts[state] as f64 / n as f64;
        let share = if total_intensity > 0.0 {
            intensity[state] / total_intensity
        } else {
            0.0
        };
        let weight = frequency * 0.6 + share * 0.4;
        match best {
            Some((_, w)) if weight <= w => {}
            _ => best = Some((*state, weight)),
        }
    }

    let max_count = counts.values().copied().max().unwrap_or(0);
    if order.len() > 2 && (max_count as f64) < n as f64 * MIXED_MAX_SHARE {
        return EmotionalState::Mixed;
    }

    best.map(|(s, _)| s).unwrap_or(EmotionalState::Neutral)
}

#[inline]
pub(crate) fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Build the journey summary. Fewer than two scores is the degenerate case
/// and yields [`JourneySummary::neutral`].
pub fn summarize(scores: &[f64], states: &[EmotionalState]) -> JourneySummary {
    if scores.len() < 2 {
        return JourneySummary::neutral();
    }

    let start = start_score(scores).clamp(-1.0, 1.0);
    let end = end_score(scores).clamp(-1.0, 1.0);
    let (lo, hi) = min_max(scores);

    JourneySummary {
        start: ScorePoint {
            score: round3(start),
            state: classify_score(start),
        },
        end: ScorePoint {
            score: round3(end),
            state: classify_score(end),
        },
        fluctuation: round3(fluctuation(scores)),
        stability: round3((stability(scores) * 100.0).clamp(0.0, 100.0)),
        trend: Trend {
            direction: trend_direction(scores),
            strength: round3((trend_strength(scores) * 100.0).clamp(0.0, 100.0)),
        },
        dominant_emotion: dominant_emotion(states, scores),
        emotional_range: EmotionalRange {
            min: round3(lo),
            max: round3(hi),
        },
    }
}
