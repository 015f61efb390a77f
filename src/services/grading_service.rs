use std::collections::{BTreeMap, HashMap};

use crate::models::question::SelectedQuestion;
use crate::models::quiz_session::{percent, AnswerKey, LangStats, ReviewItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeOutcome {
    pub correct: usize,
    pub total: usize,
    pub score: u32,
    pub per_lang_stats: BTreeMap<String, LangStats>,
}

pub struct GradingService;

impl GradingService {
    pub fn grade(
        questions: &[SelectedQuestion],
        answer_key: &AnswerKey,
        answers: &HashMap<String, usize>,
    ) -> GradeOutcome {
        let mut correct = 0usize;
        let mut per_lang_stats: BTreeMap<String, LangStats> = BTreeMap::new();

        for q in questions {
            let stats = per_lang_stats.entry(q.language.clone()).or_default();
            stats.total += 1;
            if is_correct(answers.get(&q.id).copied(), answer_key.get(&q.id).copied().flatten()) {
                correct += 1;
                stats.correct += 1;
            }
        }

        let total = questions.len();
        GradeOutcome {
            correct,
            total,
            score: percent(correct, total),
            per_lang_stats,
        }
    }

    pub fn review(
        questions: &[SelectedQuestion],
        answer_key: &AnswerKey,
        answers: &HashMap<String, usize>,
    ) -> Vec<ReviewItem> {
        questions
            .iter()
            .map(|q| {
                let given = answers.get(&q.id).copied();
                let expected = answer_key.get(&q.id).copied().flatten();
                ReviewItem {
                    id: q.id.clone(),
                    language: q.language.clone(),
                    question: q.question.clone(),
                    options: q.options.clone(),
                    your_answer: given.and_then(|i| q.options.get(i).cloned()),
                    is_correct: is_correct(given, expected),
                    correct_answer: expected.and_then(|i| q.options.get(i).cloned()),
                }
            })
            .collect()
    }
}

fn is_correct(given: Option<usize>, expected: Option<usize>) -> bool {
    matches!((given, expected), (Some(g), Some(e)) if g == e)
}
