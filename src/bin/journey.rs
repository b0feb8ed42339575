//! One-shot CLI: `journey "<transcript>"` prints a single JSON record.
//! Failures are reported in the record itself; the exit status stays 0.

use conversation_journey::config::AnalyzerConfig;
use conversation_journey::{AnalysisResult, JourneyAnalyzer, JourneySummary};
use tracing_subscriber::EnvFilter;

const USAGE_ERROR: &str = "No input text provided. Usage: journey \"your text here\"";

/// Result for the first CLI argument; a missing argument is an error record.
fn analyze_arg(arg: Option<String>, cfg: &AnalyzerConfig) -> AnalysisResult {
    match arg {
        Some(text) => JourneyAnalyzer::from_config(cfg).analyze(Some(&text)),
        None => AnalysisResult::failed(USAGE_ERROR),
    }
}

/// One JSON line; falls back to a hand-built error record if serialization fails.
fn render(result: &AnalysisResult) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| {
        serde_json::json!({
            "error": e.to_string(),
            "sentiment": "neutral",
            "score": 0.0,
            "emotional_journey": JourneySummary::neutral(),
            "confidence": 0.0
        })
        .to_string()
    })
}

fn main() {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays pure JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = analyze_arg(std::env::args().nth(1), &AnalyzerConfig::from_env());
    println!("{}", render(&result));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_argument_prints_usage_error_record() {
        let r = analyze_arg(None, &AnalyzerConfig::default());
        assert_eq!(r.error.as_deref(), Some(USAGE_ERROR));

        let v: serde_json::Value = serde_json::from_str(&render(&r)).unwrap();
        assert_eq!(v["error"], USAGE_ERROR);
        assert_eq!(v["sentiment"], "neutral");
        assert_eq!(v["score"], 0.0);
        assert_eq!(v["confidence"], 0.0);
        assert_eq!(v["emotional_journey"]["stability"], 100.0);
    }

    #[test]
    fn argument_is_analyzed_into_a_single_line() {
        let r = analyze_arg(
            Some("Agent: Hello. Customer: Thanks, that was great!".to_string()),
            &AnalyzerConfig::default(),
        );
        assert!(r.error.is_none());
        let line = render(&r);
        assert!(!line.contains('\n'));
        assert!(line.contains("\"emotional_journey\""));
    }
}
