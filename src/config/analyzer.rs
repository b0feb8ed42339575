// src/config/analyzer.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use tracing::warn;

pub const DEFAULT_ANALYZER_CONFIG_PATH: &str = "config/analyzer.json";
pub const ENV_ANALYZER_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";
pub const ENV_MYMEMORY_EMAIL: &str = "MYMEMORY_EMAIL";

fn default_seed() -> u64 {
    42
}
fn default_history_capacity() -> usize {
    500
}
fn default_provider() -> String {
    "none".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default)]
    pub enabled: bool,
    /// "none" | "mymemory" (case-insensitive)
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Optional contact e-mail for higher provider quotas.
    /// "ENV" means: read from MYMEMORY_EMAIL.
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            contact_email: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Seed for the per-call generator handed to the oracle.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Entries kept by the in-memory analysis history.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default)]
    pub translation: TranslationConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            history_capacity: default_history_capacity(),
            translation: TranslationConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: AnalyzerConfig = serde_json::from_str(&data)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load from `ANALYZER_CONFIG_PATH` (or the default path). A missing or
    /// broken file yields defaults with a warning.
    pub fn from_env() -> Self {
        let path = env::var(ENV_ANALYZER_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_ANALYZER_CONFIG_PATH.to_string());
        match Self::load_from_file(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(target: "journey", %path, error = %e, "analyzer config not loaded; using defaults");
                let mut cfg = Self::default();
                cfg.sanitize();
                cfg
            }
        }
    }

    fn sanitize(&mut self) {
        // Normalize provider
        self.translation.provider = self.translation.provider.trim().to_lowercase();

        // Resolve contact e-mail if "ENV"
        if let Some(email) = self.translation.contact_email.as_deref() {
            if email.trim().eq_ignore_ascii_case("env") {
                self.translation.contact_email = env::var(ENV_MYMEMORY_EMAIL)
                    .ok()
                    .filter(|v| !v.trim().is_empty());
            }
        }

        if self.translation.timeout_secs == 0 {
            self.translation.timeout_secs = default_timeout_secs();
        }
        if self.history_capacity == 0 {
            self.history_capacity = default_history_capacity();
        }
    }
}
