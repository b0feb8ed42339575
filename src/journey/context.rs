// src/journey/context.rs
//! # Contextual Scorer
//! Turns raw per-sentence oracle scores into smoothed, position- and
//! speaker-aware scores in [-1, 1].
//!
//! Order per sentence: blend → context smoothing → positional amplification
//! → speaker amplification → clamp → push into the window. Reordering the
//! steps changes the output.

use crate::segment::Speaker;

/// Number of recent smoothed scores kept as context.
pub const CONTEXT_CAPACITY: usize = 3;

/// Position ratios below/above these count as opening/closing remarks.
const OPENING_RATIO: f64 = 0.2;
const CLOSING_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextEntry {
    pub score: f64,
    pub speaker: Speaker,
    pub position_ratio: f64,
}

impl Default for ContextEntry {
    fn default() -> Self {
        Self {
            score: 0.0,
            speaker: Speaker::Customer,
            position_ratio: 0.0,
        }
    }
}

/// Fixed-capacity ring buffer over the most recent entries; the oldest is
/// overwritten once full.
#[derive(Debug, Clone, Default)]
pub struct ContextWindow {
    slots: [ContextEntry; CONTEXT_CAPACITY],
    /// Index of the oldest entry.
    head: usize,
    len: usize,
}

impl ContextWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, entry: ContextEntry) {
        if self.len < CONTEXT_CAPACITY {
            self.slots[(self.head + self.len) % CONTEXT_CAPACITY] = entry;
            self.len += 1;
        } else {
            self.slots[self.head] = entry;
            self.head = (self.head + 1) % CONTEXT_CAPACITY;
        }
    }

    /// Entries oldest → newest.
    pub fn iter(&self) -> impl Iterator<Item = &ContextEntry> + '_ {
        (0..self.len).map(move |i| &self.slots[(self.head + i) % CONTEXT_CAPACITY])
    }

    /// Mean score of the window, `None` when empty.
    pub fn mean_score(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.iter().map(|e| e.score).sum::<f64>() / self.len as f64)
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

/// Stateful scorer; create one per transcript.
#[derive(Debug, Clone, Default)]
pub struct ContextualScorer {
    window: ContextWindow,
}

impl ContextualScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> &ContextWindow {
        &self.window
    }

    /// Score one sentence and remember the result as context for the next.
    pub fn score(
        &mut self,
        compound: f64,
        polarity: f64,
        speaker: Speaker,
        position_ratio: f64,
    ) -> f64 {
        let mut score = compound * 0.7 + polarity * 0.3;

        // Dissonant sentences lean less on context so contrast survives.
        if let Some(context_mean) = self.window.mean_score() {
            let contrast = (score - context_mean).abs();
            let context_weight = (0.4 - contrast * 0.5).max(0.1);
            score = score * (1.0 - context_weight) + context_mean * context_weight;
        }

        let at_edge = position_ratio < OPENING_RATIO || position_ratio > CLOSING_RATIO;
        if position_ratio < OPENING_RATIO {
            score *= 1.0 + (OPENING_RATIO - position_ratio);
        } else if position_ratio > CLOSING_RATIO {
            score *= 1.0 + (position_ratio - CLOSING_RATIO);
        }

        if speaker == Speaker::Customer {
            score *= if at_edge { 1.2 } else { 1.1 };
        }

        let score = score.clamp(-1.0, 1.0);
        self.window.push(ContextEntry {
            score,
            speaker,
            position_ratio,
        });
        score
    }
}
