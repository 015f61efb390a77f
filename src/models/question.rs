use serde::{Deserialize, Serialize};

/// One entry of the question bank, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: CorrectAnswer,
}

/// Bank files store the answer either as an option index or as the option text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Index(i64),
    Text(String),
}

impl CorrectAnswer {
    /// Normalises to an index into `options`. `None` means no option can ever be correct.
    pub fn resolve(&self, options: &[String]) -> Option<usize> {
        match self {
            CorrectAnswer::Index(idx) => usize::try_from(*idx)
                .ok()
                .filter(|i| *i < options.len()),
            CorrectAnswer::Text(text) => options.iter().position(|o| o == text),
        }
    }
}

/// A bank question as presented inside one quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedQuestion {
    pub id: String,
    pub language: String,
    pub question: String,
    pub options: Vec<String>,
    pub time_limit: u32,
}
