use std::collections::BTreeMap;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::models::question::QuestionRecord;

/// Read-only mapping from language name to its questions, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    by_language: BTreeMap<String, Vec<QuestionRecord>>,
}

impl QuestionBank {
    pub fn from_json(raw: &str) -> Result<Self> {
        let by_language: BTreeMap<String, Vec<QuestionRecord>> = serde_json::from_str(raw)?;
        Ok(Self { by_language })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let bank = Self::from_json(&raw).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        tracing::info!(
            path = %path.display(),
            languages = bank.by_language.len(),
            "Question bank loaded"
        );
        Ok(bank)
    }

    pub fn languages(&self) -> Vec<String> {
        self.by_language.keys().cloned().collect()
    }

    pub fn contains(&self, language: &str) -> bool {
        self.by_language.contains_key(language)
    }

    /// Up to `n` distinct records of `language`, uniformly at random.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        language: &str,
        n: usize,
        rng: &mut R,
    ) -> Vec<QuestionRecord> {
        match self.by_language.get(language) {
            Some(records) => records.choose_multiple(rng, n).cloned().collect(),
            None => Vec::new(),
        }
    }
}
