// src/translate.rs
//! Script detection and per-line translation to English.
//!
//! Translation is best-effort: any provider failure falls back to the
//! original line and is only logged. Nothing here can fail an analysis.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::TranslationConfig;

/// Languages recognised by script range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    Hindi,
    Telugu,
    Malayalam,
}

impl SourceLanguage {
    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            SourceLanguage::Hindi => "hi",
            SourceLanguage::Telugu => "te",
            SourceLanguage::Malayalam => "ml",
        }
    }
}

/// Detect a supported non-Latin script. Devanagari wins over Telugu, which
/// wins over Malayalam, when a line mixes scripts.
pub fn detect_script(line: &str) -> Option<SourceLanguage> {
    let has = |lo: char, hi: char| line.chars().any(|c| (lo..=hi).contains(&c));
    if has('\u{0900}', '\u{097F}') {
        Some(SourceLanguage::Hindi)
    } else if has('\u{0C00}', '\u{0C7F}') {
        Some(SourceLanguage::Telugu)
    } else if has('\u{0D00}', '\u{0D7F}') {
        Some(SourceLanguage::Malayalam)
    } else {
        None
    }
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation provider refused: {0}")]
    Refused(String),
    #[error("translation provider returned an empty result")]
    Empty,
}

pub trait Translator: Send + Sync {
    fn translate_to_english(
        &self,
        text: &str,
        from: SourceLanguage,
    ) -> Result<String, TranslateError>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynTranslator = Arc<dyn Translator>;

/// Identity translator; used when translation is disabled.
#[derive(Debug, Clone, Default)]
pub struct DisabledTranslator;

impl Translator for DisabledTranslator {
    fn translate_to_english(
        &self,
        text: &str,
        _from: SourceLanguage,
    ) -> Result<String, TranslateError> {
        Ok(text.to_string())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

const MYMEMORY_URL: &str = "https://api.mymemory.translated.net/get";
const MYMEMORY_WARNING: &str = "MYMEMORY WARNING";

/// MyMemory public translation API.
///
/// Uses a blocking client, built on first use so construction never happens
/// on an async runtime thread. Call from blocking contexts only.
pub struct MyMemoryTranslator {
    http: OnceCell<reqwest::blocking::Client>,
    timeout: Duration,
    contact_email: Option<String>,
}

impl MyMemoryTranslator {
    pub fn new(contact_email: Option<String>, timeout: Duration) -> Self {
        Self {
            http: OnceCell::new(),
            timeout,
            contact_email: contact_email.filter(|e| !e.trim().is_empty()),
        }
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, TranslateError> {
        self.http.get_or_try_init(|| {
            reqwest::blocking::Client::builder()
                .user_agent("conversation-journey/0.1")
                .connect_timeout(Duration::from_secs(4))
                .timeout(self.timeout)
                .build()
                .map_err(TranslateError::from)
        })
    }
}

#[derive(Deserialize)]
struct MyMemoryResp {
    #[serde(rename = "responseData")]
    response_data: MyMemoryData,
}

#[derive(Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl Translator for MyMemoryTranslator {
    fn translate_to_english(
        &self,
        text: &str,
        from: SourceLanguage,
    ) -> Result<String, TranslateError> {
        let langpair = format!("{}|en", from.code());
        let mut query: Vec<(&str, &str)> = vec![("q", text), ("langpair", langpair.as_str())];
        if let Some(email) = self.contact_email.as_deref() {
            query.push(("de", email));
        }

        let resp: MyMemoryResp = self
            .client()?
            .get(MYMEMORY_URL)
            .query(&query)
            .send()?
            .error_for_status()?
            .json()?;

        let out = resp.response_data.translated_text.unwrap_or_default();
        let out = out.trim();
        if out.is_empty() {
            return Err(TranslateError::Empty);
        }
        if out.starts_with(MYMEMORY_WARNING) {
            return Err(TranslateError::Refused(out.chars().take(120).collect()));
        }
        Ok(out.to_string())
    }

    fn name(&self) -> &'static str {
        "mymemory"
    }
}

/// Build a translator according to config. Falls back to
/// [`DisabledTranslator`] when disabled or the provider is unknown.
pub fn build_translator(cfg: &TranslationConfig) -> DynTranslator {
    if !cfg.enabled {
        return Arc::new(DisabledTranslator);
    }
    match cfg.provider.as_str() {
        "mymemory" => Arc::new(MyMemoryTranslator::new(
            cfg.contact_email.clone(),
            Duration::from_secs(cfg.timeout_secs),
        )),
        other => {
            tracing::warn!(target: "journey", provider = other, "unknown translation provider; translation disabled");
            Arc::new(DisabledTranslator)
        }
    }
}

/// Leading speaker prefix kept verbatim when translating a line.
fn split_prefix(line: &str) -> (&str, &str) {
    if line.starts_with("Customer:") || line.starts_with("Agent:") {
        if let Some(idx) = line.find(':') {
            return (&line[..=idx], line[idx + 1..].trim());
        }
    }
    ("", line.trim())
}

/// Translate every line that contains a supported script; everything else
/// passes through unchanged. Failures fall back to the original line.
pub fn translate_lines(translator: &dyn Translator, text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                return line.to_string();
            }
            let (prefix, content) = split_prefix(line);
            let Some(lang) = detect_script(content) else {
                return line.to_string();
            };
            match translator.translate_to_english(content, lang) {
                Ok(translated) if !translated.trim().is_empty() => {
                    debug!(target: "journey", lang = lang.code(), provider = translator.name(), "line translated");
                    if prefix.is_empty() {
                        translated
                    } else {
                        format!("{prefix} {translated}")
                    }
                }
                Ok(_) => line.to_string(),
                Err(e) => {
                    debug!(target: "journey", lang = lang.code(), error = %e, "translation failed; keeping original line");
                    line.to_string()
                }
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
