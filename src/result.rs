use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::Answer;
use crate::error::QuizError;
use crate::model::{Question, QuestionKind};

/// The record produced at submission, created exactly once per attempt
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    pub quiz_id: String,
    pub quiz_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub attempt: u32,
    /// One flattened scalar per question, in question order.
    pub answers: Vec<String>,
    /// Percentage in `[0, 100]`.
    pub score: u8,
    pub completed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent_seconds: Option<u32>,
}

/// Flatten typed answers into storage-safe scalars. The store cannot
/// hold nested lists, so collection-shaped answers are comma-joined into
/// a single string; plain selections stringify as-is and unanswered
/// questions become the empty string.
pub fn serialize_answers(answers: &[Answer]) -> Vec<String> {
    answers.iter().map(flatten).collect()
}

fn flatten(answer: &Answer) -> String {
    match answer {
        Answer::Choice(None) => String::new(),
        Answer::Choice(Some(sel)) => sel.to_string(),
        Answer::Selection(set) => set
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(","),
        Answer::Blanks(slots) => {
            for word in slots.iter().flatten() {
                if word.contains(',') {
                    // the comma is the join character; such a word will
                    // not survive the round-trip intact
                    log::warn!("blank word {:?} contains a comma; stored form is ambiguous", word);
                }
            }
            slots
                .iter()
                .map(|s| s.as_deref().unwrap_or(""))
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

/// Rebuild typed answers from their flattened form, using each
/// question's declared type to decide how a stored string splits.
/// Lossless for every valid answer shape.
pub fn deserialize_answers(
    flat: &[String],
    questions: &[Question],
) -> Result<Vec<Answer>, QuizError> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let raw = flat.get(i).map(|s| s.as_str()).unwrap_or("");
            restore(raw, q, i)
        })
        .collect()
}

fn restore(raw: &str, question: &Question, index: usize) -> Result<Answer, QuizError> {
    let bad = |reason: String| QuizError::Deserialize {
        question: index,
        reason,
    };

    match &question.kind {
        QuestionKind::SingleChoice { .. } | QuestionKind::Boolean { .. } => {
            if raw.is_empty() {
                return Ok(Answer::Choice(None));
            }
            let sel = raw
                .parse::<usize>()
                .map_err(|_| bad(format!("expected an option index, got {:?}", raw)))?;
            Ok(Answer::Choice(Some(sel)))
        }
        QuestionKind::MultiChoice { .. } => {
            if raw.is_empty() {
                return Ok(Answer::Selection(BTreeSet::new()));
            }
            let set = raw
                .split(',')
                .map(|part| {
                    part.parse::<usize>()
                        .map_err(|_| bad(format!("expected option indices, got {:?}", raw)))
                })
                .collect::<Result<BTreeSet<usize>, _>>()?;
            Ok(Answer::Selection(set))
        }
        QuestionKind::FillBlank(fb) => {
            let mut slots: Vec<Option<String>> = raw
                .split(',')
                .map(|w| {
                    if w.is_empty() {
                        None
                    } else {
                        Some(w.to_string())
                    }
                })
                .collect();
            // an all-empty answer flattens to fewer separators than
            // there are blanks; pad back out to the declared width
            slots.resize(fb.blank_count(), None);
            Ok(Answer::Blanks(slots))
        }
    }
}
