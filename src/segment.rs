// src/segment.rs
//! Sentence segmentation with speaker attribution.
//!
//! Splits on Latin terminators, the Devanagari danda (`।`) and newlines.
//! Speaker markers are matched case-insensitively as a substring anywhere
//! in the sentence, so "I asked the agent: nothing happened" also switches
//! the speaker. That matches how transcripts were historically scored and
//! is covered by a dedicated test.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Conversation role of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Speaker {
    #[default]
    Customer,
    Agent,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Customer => "Customer",
            Speaker::Agent => "Agent",
        }
    }
}

/// Agent markers are checked before customer markers.
const SPEAKER_MARKERS: &[(&str, Speaker)] = &[
    ("agent:", Speaker::Agent),
    ("agent :", Speaker::Agent),
    ("representative:", Speaker::Agent),
    ("customer:", Speaker::Customer),
    ("customer :", Speaker::Customer),
    ("client:", Speaker::Customer),
];

/// One sentence of the transcript, marker prefix already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub speaker: Speaker,
    /// 0-based position in the transcript.
    pub index: usize,
    pub total_count: usize,
}

impl Utterance {
    /// `index / total_count`, in `[0, 1)`.
    pub fn position_ratio(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.index as f64 / self.total_count as f64
        }
    }
}

/// Which speaker marker (if any) occurs in the sentence.
pub fn detect_speaker(sentence: &str) -> Option<Speaker> {
    let lowered = sentence.to_lowercase();
    SPEAKER_MARKERS
        .iter()
        .find(|(marker, _)| lowered.contains(marker))
        .map(|(_, speaker)| *speaker)
}

/// Drop everything up to and including the first `:`.
fn strip_marker(sentence: &str) -> &str {
    match sentence.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => sentence,
    }
}

fn split_sentences(text: &str) -> Vec<&str> {
    static RE_TERM: OnceCell<Regex> = OnceCell::new();
    let re = RE_TERM.get_or_init(|| Regex::new(r"[।.!?\n]+").unwrap());
    re.split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split a transcript into ordered utterances.
///
/// The speaker starts as [`Speaker::Customer`] and carries over until the
/// next marker.
pub fn segment(text: &str) -> Vec<Utterance> {
    let sentences = split_sentences(text);
    let total = sentences.len();
    let mut current = Speaker::default();

    sentences
        .into_iter()
        .enumerate()
        .map(|(index, sentence)| {
            let body = match detect_speaker(sentence) {
                Some(speaker) => {
                    current = speaker;
                    strip_marker(sentence)
                }
                None => sentence,
            };
            Utterance {
                text: body.to_string(),
                speaker: current,
                index,
                total_count: total,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminators_and_tracks_speakers() {
        let u = segment("Agent: Thank you for calling. Customer: This is great, thank you so much!");
        assert_eq!(u.len(), 2);
        assert_eq!(u[0].speaker, Speaker::Agent);
        assert_eq!(u[0].text, "Thank you for calling");
        assert_eq!(u[1].speaker, Speaker::Customer);
        assert_eq!(u[1].text, "This is great, thank you so much");
        assert_eq!(u[1].index, 1);
        assert_eq!(u[1].total_count, 2);
    }

    #[test]
    fn defaults_to_customer_without_markers() {
        let u = segment("It broke again\nI want a refund?");
        assert_eq!(u.len(), 2);
        assert!(u.iter().all(|x| x.speaker == Speaker::Customer));
    }

    #[test]
    fn speaker_carries_over_until_next_marker() {
        let u = segment("AGENT: Hello. How can I help? Client: My order is late.");
        let speakers: Vec<Speaker> = u.iter().map(|x| x.speaker).collect();
        assert_eq!(
            speakers,
            vec![Speaker::Agent, Speaker::Agent, Speaker::Customer]
        );
        assert_eq!(u[2].text, "My order is late");
    }

    #[test]
    fn synonyms_map_onto_roles() {
        assert_eq!(detect_speaker("Representative: one moment"), Some(Speaker::Agent));
        assert_eq!(detect_speaker("client: ok"), Some(Speaker::Customer));
        assert_eq!(detect_speaker("no marker here"), None);
    }

    #[test]
    fn danda_and_blank_segments() {
        let u = segment("पहला वाक्य। दूसरा वाक्य।\n\n...!");
        assert_eq!(u.len(), 2);
        assert_eq!(u[0].text, "पहला वाक्य");
    }

    #[test]
    fn mid_sentence_mention_switches_speaker() {
        // Substring matching anywhere: a customer quoting "the agent:" flips
        // attribution and loses everything before the colon.
        let u = segment("Customer: I waited. Then I told the agent: this is useless");
        assert_eq!(u[0].speaker, Speaker::Customer);
        assert_eq!(u[1].speaker, Speaker::Agent);
        assert_eq!(u[1].text, "this is useless");
    }

    #[test]
    fn position_ratio_is_index_over_total() {
        let u = segment("a. b. c. d");
        assert_eq!(u[0].position_ratio(), 0.0);
        assert!((u[3].position_ratio() - 0.75).abs() < 1e-12);
    }
}
