// src/lib.rs
// Public library surface for the server/CLI binaries and integration tests.

pub mod analyzer;
pub mod api;
pub mod config;
pub mod history;
pub mod journey;
pub mod metrics;
pub mod normalize;
pub mod oracle;
pub mod overall;
pub mod segment;
pub mod translate;

// ---- Re-exports for stable public API ----
pub use crate::analyzer::{AnalysisError, AnalysisResult, JourneyAnalyzer};
pub use crate::api::router;
pub use crate::journey::{EmotionalState, JourneySummary, TrendDirection};
pub use crate::oracle::{LexiconOracle, RawSentiment, SentimentOracle};

/// One-shot analysis with the default analyzer (lexicon oracle, no
/// translation, seed 42).
///
/// ```
/// let r = conversation_journey::analyze("Agent: Hello. Customer: Thanks, that was great!");
/// assert!(r.error.is_none());
/// ```
pub fn analyze(text: &str) -> AnalysisResult {
    JourneyAnalyzer::default().analyze(Some(text))
}
