// src/oracle/lexicon.rs
//! Deterministic lexicon oracle.
//!
//! Two bundled word lists, scored independently:
//! - `sentiment_lexicon.json`: valence in roughly [-4, 4], summed with
//!   booster, negation, "but" and exclamation rules, then squashed into
//!   [-1, 1] (the compound score).
//! - `polarity_lexicon.json`: per-word polarity in [-1, 1], averaged over
//!   polarity-bearing words with intensifiers and softened negation.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use std::collections::HashMap;

use super::{OracleError, RawSentiment, SentimentOracle};

static VALENCE: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid sentiment lexicon")
});

static POLARITY: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../../polarity_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid polarity lexicon")
});

const BOOSTER_INCR: f64 = 0.293;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_INCR: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
/// Normalization constant for `s / sqrt(s^2 + alpha)`.
const ALPHA: f64 = 15.0;

#[derive(Debug, Clone, Default)]
pub struct LexiconOracle;

impl LexiconOracle {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn valence(&self, w: &str) -> f64 {
        *VALENCE.get(w).unwrap_or(&0.0)
    }

    /// Per-token valences after booster, negation and "but" adjustments.
    fn token_valences(&self, tokens: &[String]) -> Vec<f64> {
        let but_at = tokens.iter().position(|t| t == "but");

        tokens
            .iter()
            .enumerate()
            .map(|(i, tok)| {
                let base = self.valence(tok);
                if base == 0.0 {
                    return 0.0;
                }
                let mut v = base;

                if i >= 1 {
                    if let Some(b) = booster_scalar(&tokens[i - 1]) {
                        v += if v > 0.0 { b } else { -b };
                    }
                }

                // negator in the previous 1..=3 tokens flips and dampens
                if (1..=3).any(|k| i >= k && is_negator(&tokens[i - k])) {
                    v *= NEGATION_SCALAR;
                }

                if let Some(b) = but_at {
                    if i < b {
                        v *= 0.5;
                    } else if i > b {
                        v *= 1.5;
                    }
                }
                v
            })
            .collect()
    }

    /// Compound score and neutral fraction.
    fn compound(&self, text: &str, tokens: &[String]) -> (f64, f64) {
        let valences = self.token_valences(tokens);
        let mut sum: f64 = valences.iter().sum();

        let bangs = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64;
        if sum > 0.0 {
            sum += bangs * EXCLAMATION_INCR;
        } else if sum < 0.0 {
            sum -= bangs * EXCLAMATION_INCR;
        }

        let compound = (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0);

        let (mut pos, mut neg, mut neu) = (0.0f64, 0.0f64, 0.0f64);
        for v in valences {
            if v > 0.0 {
                pos += v + 1.0;
            } else if v < 0.0 {
                neg += v - 1.0;
            } else {
                neu += 1.0;
            }
        }
        let total = pos + neg.abs() + neu;
        let neutral_fraction = if total > 0.0 { neu / total } else { 0.0 };

        (compound, neutral_fraction)
    }

    /// Mean polarity of polarity-bearing words (0 when none).
    fn polarity(&self, tokens: &[String]) -> f64 {
        let mut acc = Vec::new();
        for (i, tok) in tokens.iter().enumerate() {
            let Some(&p) = POLARITY.get(tok.as_str()) else {
                continue;
            };
            let mut p = p;
            if i >= 1 {
                if let Some(m) = intensifier(&tokens[i - 1]) {
                    p *= m;
                }
            }
            if (1..=2).any(|k| i >= k && is_negator(&tokens[i - k])) {
                p *= -0.5;
            }
            acc.push(p.clamp(-1.0, 1.0));
        }
        if acc.is_empty() {
            0.0
        } else {
            acc.iter().sum::<f64>() / acc.len() as f64
        }
    }
}

impl SentimentOracle for LexiconOracle {
    fn score_text(&self, text: &str, _rng: &mut StdRng) -> Result<RawSentiment, OracleError> {
        let tokens: Vec<String> = tokenize(text).collect();
        let (compound, neutral_fraction) = self.compound(text, &tokens);
        let polarity = self.polarity(&tokens);
        RawSentiment::new(compound, polarity, neutral_fraction)
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Word tokens, lower-case; apostrophes stay inside words ("isn't").
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "cannot"
            | "without"
            | "nor"
            | "neither"
            | "nobody"
            | "none"
    ) || tok.ends_with("n't")
}

/// Signed increment for boosters (+) and dampeners (-).
fn booster_scalar(tok: &str) -> Option<f64> {
    match tok {
        "very" | "really" | "so" | "extremely" | "absolutely" | "incredibly" | "totally"
        | "completely" | "super" | "truly" | "highly" => Some(BOOSTER_INCR),
        "slightly" | "somewhat" | "barely" | "hardly" | "marginally" | "partly" => {
            Some(-BOOSTER_INCR)
        }
        _ => None,
    }
}

fn intensifier(tok: &str) -> Option<f64> {
    match tok {
        "very" | "really" | "so" | "super" | "highly" => Some(1.3),
        "extremely" | "absolutely" | "incredibly" | "totally" | "completely" => Some(1.5),
        "slightly" | "somewhat" | "fairly" => Some(0.7),
        _ => None,
    }
}
