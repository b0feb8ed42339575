// src/analyzer.rs
//! # Journey Analyzer
//! Top-level pipeline: validate → normalize → translate → segment → score
//! each utterance in context → aggregate the journey → document sentiment
//! and confidence.
//!
//! Every call is independent. The only per-call state is the scorer's
//! context window and a generator seeded from the configured seed, so the
//! same input always produces the same output.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use metrics::{counter, histogram};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AnalyzerConfig;
use crate::history::anon_hash;
use crate::journey::{self, classify_sentence, ContextualScorer, EmotionalState, JourneySummary};
use crate::normalize::{clean_for_emptiness, normalize_transcript};
use crate::oracle::{DynOracle, LexiconOracle, OracleError};
use crate::overall::{confidence, overall_sentiment};
use crate::segment::segment;
use crate::translate::{build_translator, translate_lines, DisabledTranslator, DynTranslator};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No text provided or invalid input type")]
    MissingInput,
    #[error("Text is empty after cleaning")]
    EmptyAfterCleaning,
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl AnalysisError {
    /// Short stable name, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::MissingInput => "missing_input",
            AnalysisError::EmptyAfterCleaning => "empty_after_cleaning",
            AnalysisError::Oracle(_) => "oracle_failure",
            AnalysisError::Unexpected(_) => "unexpected",
        }
    }
}

/// Flat result record. Error results carry safe defaults plus `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub sentiment: EmotionalState,
    pub score: f64,
    pub emotional_journey: JourneySummary,
    pub confidence: f64,
}

impl AnalysisResult {
    /// Safe-default record for a failed analysis.
    pub fn from_error(err: &AnalysisError) -> Self {
        Self::failed(err.to_string())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            sentiment: EmotionalState::Neutral,
            score: 0.0,
            emotional_journey: JourneySummary::neutral(),
            confidence: 0.0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Reusable analyzer; cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct JourneyAnalyzer {
    oracle: DynOracle,
    translator: DynTranslator,
    seed: u64,
}

impl Default for JourneyAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(LexiconOracle::new()))
    }
}

impl JourneyAnalyzer {
    /// Analyzer with the given oracle, translation disabled, seed 42.
    pub fn new(oracle: DynOracle) -> Self {
        Self {
            oracle,
            translator: Arc::new(DisabledTranslator),
            seed: AnalyzerConfig::default().seed,
        }
    }

    /// Lexicon oracle plus whatever translator the config asks for.
    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        Self {
            oracle: Arc::new(LexiconOracle::new()),
            translator: build_translator(&cfg.translation),
            seed: cfg.seed,
        }
    }

    pub fn with_translator(mut self, translator: DynTranslator) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn oracle_name(&self) -> &'static str {
        self.oracle.name()
    }

    /// Analyze a transcript; never fails. Errors (including panics inside
    /// collaborators) become the safe-default record with `error` set.
    pub fn analyze(&self, text: Option<&str>) -> AnalysisResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.try_analyze(text)))
            .unwrap_or_else(|payload| {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "panic in analysis pipeline".to_string());
                Err(AnalysisError::Unexpected(msg))
            });

        match outcome {
            Ok(result) => {
                counter!("journey_analyses_total").increment(1);
                result
            }
            Err(e) => {
                counter!("journey_errors_total", "kind" => e.kind()).increment(1);
                warn!(target: "journey", kind = e.kind(), error = %e, "analysis failed");
                AnalysisResult::from_error(&e)
            }
        }
    }

    /// Analyze a transcript, surfacing the error kind.
    pub fn try_analyze(&self, text: Option<&str>) -> Result<AnalysisResult, AnalysisError> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let raw_text = match text {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AnalysisError::MissingInput),
        };

        let normalized = normalize_transcript(raw_text);
        if clean_for_emptiness(&normalized).is_empty() {
            return Err(AnalysisError::EmptyAfterCleaning);
        }

        let id = anon_hash(raw_text);
        let english = translate_lines(self.translator.as_ref(), &normalized);

        let journey = self.emotional_journey(&english, &mut rng)?;

        let doc = self.oracle.score_text(&english, &mut rng)?;
        let overall = overall_sentiment(&doc);
        let confidence = confidence(&doc, journey.start.score, journey.end.score);

        info!(
            target: "journey",
            %id,
            oracle = self.oracle.name(),
            sentiment = %overall.sentiment,
            score = overall.score,
            confidence,
            trend = ?journey.trend.direction,
            "transcript analyzed"
        );

        Ok(AnalysisResult {
            error: None,
            sentiment: overall.sentiment,
            score: overall.score,
            emotional_journey: journey,
            confidence,
        })
    }

    /// Segment, score each utterance in context, and summarize.
    /// Zero utterances short-circuit to the neutral journey without
    /// touching the oracle.
    pub fn emotional_journey(
        &self,
        text: &str,
        rng: &mut StdRng,
    ) -> Result<JourneySummary, AnalysisError> {
        let utterances = segment(text);
        if utterances.is_empty() {
            return Ok(JourneySummary::neutral());
        }
        histogram!("journey_utterances").record(utterances.len() as f64);

        let mut scorer = ContextualScorer::new();
        let mut scores = Vec::with_capacity(utterances.len());
        let mut states = Vec::with_capacity(utterances.len());

        for u in &utterances {
            let raw = self.oracle.score_text(&u.text, rng)?;
            let score = scorer.score(raw.compound, raw.polarity, u.speaker, u.position_ratio());
            let state = classify_sentence(score, Some(raw.neutral_fraction));
            debug!(
                target: "journey",
                index = u.index,
                speaker = u.speaker.as_str(),
                score,
                state = %state,
                "utterance scored"
            );
            scores.push(score);
            states.push(state);
        }

        Ok(journey::summarize(&scores, &states))
    }
}
