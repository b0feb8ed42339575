// src/normalize.rs
//! Transcript normalization before segmentation.
//!
//! Two passes with different jobs:
//! - [`normalize_transcript`] tidies the text but keeps punctuation and line
//!   breaks, because both are sentence terminators for the segmenter.
//! - [`clean_for_emptiness`] strips everything except word characters and
//!   Indic scripts; it only decides whether anything analyzable is left.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Normalize transcript text: decode entities, drop tags, ASCII quotes,
/// collapse horizontal whitespace per line, trim.
pub fn normalize_transcript(s: &str) -> String {
    // 1) HTML entity decode
    let decoded = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    let untagged = re_tags.replace_all(&decoded, "");

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    let quoted = untagged
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse spaces/tabs inside each line; newlines are kept
    static RE_HWS: OnceCell<Regex> = OnceCell::new();
    let re_hws = RE_HWS.get_or_init(|| Regex::new(r"[^\S\n]+").unwrap());
    let lines: Vec<String> = quoted
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(|line| re_hws.replace_all(line, " ").trim().to_string())
        .collect();

    lines.join("\n").trim().to_string()
}

/// Danda and double danda: sentence terminators, not content.
const DANDA: char = '\u{0964}';
const DOUBLE_DANDA: char = '\u{0965}';

/// Aggressive cleaning: keep word characters, whitespace and the Indic
/// script blocks (U+0900..=U+0D7F) minus the dandas, drop everything else.
pub fn clean_for_emptiness(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c.is_alphanumeric()
                || c == '_'
                || c.is_whitespace()
                || (('\u{0900}'..='\u{0D7F}').contains(&c) && c != DANDA && c != DOUBLE_DANDA)
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_newlines_and_punctuation() {
        let out = normalize_transcript("  Customer:   hi there!\r\nAgent:\tHello.  ");
        assert_eq!(out, "Customer: hi there!\nAgent: Hello.");
    }

    #[test]
    fn decodes_entities_and_strips_tags() {
        let out = normalize_transcript("<p>Fish &amp; chips</p> “great”");
        assert_eq!(out, "Fish & chips \"great\"");
    }

    #[test]
    fn punctuation_only_cleans_to_empty() {
        assert!(clean_for_emptiness(".").is_empty());
        assert!(clean_for_emptiness(" ?! ... ").is_empty());
        assert!(clean_for_emptiness("\n\t ").is_empty());
        assert!(clean_for_emptiness("।").is_empty());
        assert!(clean_for_emptiness(" ॥ । ").is_empty());
    }

    #[test]
    fn indic_scripts_survive_cleaning() {
        assert_eq!(clean_for_emptiness("धन्यवाद।"), "धन्यवाद");
        assert_eq!(clean_for_emptiness("ok!"), "ok");
    }
}
