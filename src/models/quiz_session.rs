use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::question::SelectedQuestion;
use crate::services::grading_service::GradingService;

/// Question id -> index of the correct option (`None` when the bank answer matched no option).
pub type AnswerKey = HashMap<String, Option<usize>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LangStats {
    pub correct: u32,
    pub total: u32,
}

/// Frozen outcome of a submitted quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: u32,
    pub total: usize,
    pub passed: bool,
    pub threshold: u32,
    pub per_lang_stats: BTreeMap<String, LangStats>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub current_index: usize,
    pub total: usize,
    pub question: SelectedQuestion,
    pub selected_answer: Option<usize>,
    pub progress: u32,
    pub submitted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub id: String,
    pub language: String,
    pub question: String,
    pub options: Vec<String>,
    pub your_answer: Option<String>,
    pub is_correct: bool,
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "next" => Some(Direction::Next),
            "prev" => Some(Direction::Prev),
            _ => None,
        }
    }
}

/// One assessment attempt. `result` is `None` while in progress and frozen once submitted.
#[derive(Debug, Clone)]
pub struct QuizSession {
    languages: Vec<String>,
    questions: Vec<SelectedQuestion>,
    answer_key: AnswerKey,
    answers: HashMap<String, usize>,
    current_index: usize,
    threshold: u32,
    started_at: DateTime<Utc>,
    result: Option<QuizResult>,
}

impl QuizSession {
    /// Builds an in-progress quiz. Each question carries its resolved answer so the
    /// key always covers every presented id.
    pub fn new(
        languages: Vec<String>,
        questions: Vec<(SelectedQuestion, Option<usize>)>,
        threshold: u32,
    ) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::BadRequest(
                "No questions found for selected languages".to_string(),
            ));
        }
        let answer_key = questions
            .iter()
            .map(|(q, correct)| (q.id.clone(), *correct))
            .collect();
        let questions = questions.into_iter().map(|(q, _)| q).collect();

        Ok(Self {
            languages,
            questions,
            answer_key,
            answers: HashMap::new(),
            current_index: 0,
            threshold,
            started_at: Utc::now(),
            result: None,
        })
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn questions(&self) -> &[SelectedQuestion] {
        &self.questions
    }

    pub fn answer_key(&self) -> &AnswerKey {
        &self.answer_key
    }

    pub fn answers(&self) -> &HashMap<String, usize> {
        &self.answers
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    pub fn current_index(&self) -> usize {
        self.current_index.min(self.last_index())
    }

    fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    pub fn current(&self) -> QuestionView {
        let idx = self.current_index();
        let question = self.questions[idx].clone();
        let selected_answer = self.answers.get(&question.id).copied();
        QuestionView {
            current_index: idx,
            total: self.total(),
            question,
            selected_answer,
            progress: percent(self.answers.len(), self.total()),
            submitted: self.is_submitted(),
        }
    }

    pub fn answer(&mut self, question_id: &str, answer_index: i64) -> Result<()> {
        if self.is_submitted() {
            return Err(Error::State("Quiz already submitted".to_string()));
        }
        let question = self
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| Error::BadRequest("Invalid questionId".to_string()))?;
        let idx = usize::try_from(answer_index)
            .ok()
            .filter(|i| *i < question.options.len())
            .ok_or_else(|| Error::BadRequest("Invalid answerIndex".to_string()))?;

        self.answers.insert(question.id.clone(), idx);
        Ok(())
    }

    /// Moves the cursor one step; stays put at either end.
    pub fn navigate(&mut self, direction: Option<Direction>) -> usize {
        let idx = self.current_index();
        self.current_index = match direction {
            Some(Direction::Next) => (idx + 1).min(self.last_index()),
            Some(Direction::Prev) => idx.saturating_sub(1),
            None => idx,
        };
        self.current_index
    }

    /// Scores once. Later calls return the cached result untouched.
    pub fn submit(&mut self) -> QuizResult {
        if let Some(result) = &self.result {
            return result.clone();
        }
        let outcome = GradingService::grade(&self.questions, &self.answer_key, &self.answers);
        let result = QuizResult {
            score: outcome.score,
            total: outcome.total,
            passed: outcome.score >= self.threshold,
            threshold: self.threshold,
            per_lang_stats: outcome.per_lang_stats,
        };
        self.result = Some(result.clone());
        result
    }

    pub fn result(&self) -> Result<&QuizResult> {
        self.result
            .as_ref()
            .ok_or_else(|| Error::State("No result yet".to_string()))
    }

    pub fn review(&self) -> Result<Vec<ReviewItem>> {
        if !self.is_submitted() {
            return Err(Error::State("No review available".to_string()));
        }
        Ok(GradingService::review(
            &self.questions,
            &self.answer_key,
            &self.answers,
        ))
    }

    /// True once submitted with a score at or above the threshold.
    pub fn has_passed(&self) -> bool {
        self.result.as_ref().map(|r| r.passed).unwrap_or(false)
    }
}

pub(crate) fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}
