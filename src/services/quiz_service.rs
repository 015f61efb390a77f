use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::models::question::SelectedQuestion;
use crate::models::quiz_session::QuizSession;
use crate::services::question_bank::QuestionBank;

pub const DEFAULT_PER_LANGUAGE: u32 = 5;
pub const DEFAULT_TIME_PER_QUESTION: u32 = 60;
pub const DEFAULT_THRESHOLD: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartParams {
    pub languages: Vec<String>,
    pub per_language: u32,
    pub time_per_question: u32,
    pub threshold: u32,
}

impl Default for StartParams {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            per_language: DEFAULT_PER_LANGUAGE,
            time_per_question: DEFAULT_TIME_PER_QUESTION,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Clone)]
pub struct QuizService {
    bank: Arc<QuestionBank>,
}

impl QuizService {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Starts a fresh quiz. Falls back to `detected` when no languages were requested.
    pub fn start(&self, params: StartParams, detected: &[String]) -> Result<QuizSession> {
        self.start_with_rng(params, detected, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        &self,
        params: StartParams,
        detected: &[String],
        rng: &mut R,
    ) -> Result<QuizSession> {
        let requested = if params.languages.is_empty() {
            detected.to_vec()
        } else {
            params.languages
        };
        let mut languages: Vec<String> = Vec::with_capacity(requested.len());
        for lang in requested {
            if !languages.contains(&lang) {
                languages.push(lang);
            }
        }
        if languages.is_empty() {
            return Err(Error::BadRequest(
                "No languages selected or detected".to_string(),
            ));
        }

        let mut pool: Vec<(SelectedQuestion, Option<usize>)> = Vec::new();
        let mut ordinal = 1u32;
        for lang in languages.iter().filter(|l| self.bank.contains(l)) {
            for record in self.bank.sample(lang, params.per_language as usize, rng) {
                let correct = record.correct_answer.resolve(&record.options);
                if correct.is_none() {
                    tracing::warn!(
                        language = %lang,
                        question = %record.question,
                        "Bank answer matches no option; question cannot be scored correct"
                    );
                }
                pool.push((
                    SelectedQuestion {
                        id: format!("{}-{}", lang, ordinal),
                        language: lang.clone(),
                        question: record.question,
                        options: record.options,
                        time_limit: params.time_per_question,
                    },
                    correct,
                ));
                ordinal += 1;
            }
        }

        pool.shuffle(rng);
        let quiz = QuizSession::new(languages, pool, params.threshold)?;
        tracing::info!(
            languages = ?quiz.languages(),
            total = quiz.total(),
            threshold = quiz.threshold(),
            "Quiz started"
        );
        Ok(quiz)
    }
}
