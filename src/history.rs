//! history.rs: bounded in-memory log of analyses for the `/history` route.
//!
//! Entries never hold transcript text, only a short SHA-256 fingerprint.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::analyzer::AnalysisResult;
use crate::journey::{EmotionalState, TrendDirection};

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub ts_unix: u64,
    /// First 6 bytes of SHA-256 over the raw transcript, hex.
    pub transcript_id: String,
    pub sentiment: EmotionalState,
    pub score: f64,
    pub confidence: f64,
    pub dominant_emotion: EmotionalState,
    pub trend: TrendDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query over stored entries; `None` fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryFilter {
    pub sentiment: Option<EmotionalState>,
    /// Inclusive lower bound on `ts_unix`.
    pub since: Option<u64>,
    /// Inclusive upper bound on `ts_unix`.
    pub until: Option<u64>,
}

impl HistoryFilter {
    pub fn matches(&self, e: &HistoryEntry) -> bool {
        self.sentiment.map_or(true, |want| want == e.sentiment)
            && self.since.map_or(true, |lo| e.ts_unix >= lo)
            && self.until.map_or(true, |hi| e.ts_unix <= hi)
    }
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, 10_000);
        Self {
            inner: Mutex::new(Vec::with_capacity(cap)),
            cap,
        }
    }

    pub fn push(&self, text: &str, r: &AnalysisResult) {
        self.insert(HistoryEntry {
            ts_unix: now_unix(),
            transcript_id: anon_hash(text),
            sentiment: r.sentiment,
            score: r.score,
            confidence: r.confidence,
            dominant_emotion: r.emotional_journey.dominant_emotion,
            trend: r.emotional_journey.trend.direction,
            error: r.error.clone(),
        });
    }

    fn insert(&self, entry: HistoryEntry) {
        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    /// Most recent `n` entries matching `filter` (newest last).
    pub fn snapshot_last_n(&self, n: usize, filter: &HistoryFilter) -> Vec<HistoryEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let mut out: Vec<HistoryEntry> = v
            .iter()
            .rev()
            .filter(|e| filter.matches(e))
            .take(n)
            .cloned()
            .collect();
        out.reverse();
        out
    }

    /// All entries for one transcript fingerprint, oldest first.
    pub fn find_by_id(&self, transcript_id: &str) -> Vec<HistoryEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        v.iter()
            .filter(|e| e.transcript_id == transcript_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("history mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Short hex fingerprint of a text; safe to log.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
