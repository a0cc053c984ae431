use std::collections::BTreeSet;

use crate::error::QuizError;
use crate::model::{Question, QuestionKind};

/// One answer slot. The shape is fixed by the question's type when the
/// sheet is created and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Single-choice and boolean questions: the selected option index.
    /// Booleans use index 1 for true and 0 for false.
    Choice(Option<usize>),
    /// Multi-choice questions: the set of toggled option indices.
    Selection(BTreeSet<usize>),
    /// Fill-blank questions: one slot per blank, left to right.
    /// `None` means the blank was never filled.
    Blanks(Vec<Option<String>>),
}

impl Answer {
    fn neutral_for(question: &Question) -> Answer {
        match &question.kind {
            QuestionKind::SingleChoice { .. } | QuestionKind::Boolean { .. } => {
                Answer::Choice(None)
            }
            QuestionKind::MultiChoice { .. } => Answer::Selection(BTreeSet::new()),
            QuestionKind::FillBlank(fb) => Answer::Blanks(vec![None; fb.blank_count()]),
        }
    }

    pub fn is_answered(&self) -> bool {
        match self {
            Answer::Choice(sel) => sel.is_some(),
            Answer::Selection(set) => !set.is_empty(),
            Answer::Blanks(slots) => slots
                .iter()
                .any(|s| s.as_deref().is_some_and(|w| !w.trim().is_empty())),
        }
    }
}

/// In-memory answers for one attempt, keyed by question index. Mutated
/// only through the typed operations below; the session freezes it by
/// refusing mutation once submission starts.
#[derive(Debug, Clone)]
pub struct AnswerSheet {
    slots: Vec<Answer>,
}

impl AnswerSheet {
    pub fn new(questions: &[Question]) -> Self {
        Self {
            slots: questions.iter().map(Answer::neutral_for).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, question: usize) -> Option<&Answer> {
        self.slots.get(question)
    }

    pub fn answers(&self) -> &[Answer] {
        &self.slots
    }

    /// Indices of questions with no usable answer yet.
    pub fn unanswered(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.is_answered())
            .map(|(i, _)| i)
            .collect()
    }

    /// Replace the selection of a single-choice or boolean question.
    pub fn select(&mut self, question: usize, option: usize) -> Result<(), QuizError> {
        match self.slot_mut(question)? {
            Answer::Choice(sel) => {
                *sel = Some(option);
                Ok(())
            }
            _ => Err(shape_error(question, "not a single-selection question")),
        }
    }

    /// Toggle membership of one option in a multi-choice answer set.
    pub fn toggle(&mut self, question: usize, option: usize) -> Result<(), QuizError> {
        match self.slot_mut(question)? {
            Answer::Selection(set) => {
                if !set.remove(&option) {
                    set.insert(option);
                }
                Ok(())
            }
            _ => Err(shape_error(question, "not a multi-choice question")),
        }
    }

    /// Set exactly one blank slot, leaving the others untouched.
    pub fn set_blank(
        &mut self,
        question: usize,
        blank: usize,
        word: &str,
    ) -> Result<(), QuizError> {
        match self.slot_mut(question)? {
            Answer::Blanks(slots) => {
                let slot = slots.get_mut(blank).ok_or_else(|| QuizError::InvalidAnswer {
                    question,
                    reason: format!("blank {} out of range", blank),
                })?;
                *slot = if word.is_empty() {
                    None
                } else {
                    Some(word.to_string())
                };
                Ok(())
            }
            _ => Err(shape_error(question, "not a fill-blank question")),
        }
    }

    fn slot_mut(&mut self, question: usize) -> Result<&mut Answer, QuizError> {
        let count = self.slots.len();
        self.slots
            .get_mut(question)
            .ok_or_else(|| QuizError::InvalidAnswer {
                question,
                reason: format!("question index out of range (have {})", count),
            })
    }
}

fn shape_error(question: usize, reason: &str) -> QuizError {
    QuizError::InvalidAnswer {
        question,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FillBlank;

    fn questions() -> Vec<Question> {
        vec![
            Question {
                prompt: "single".into(),
                points: 1.0,
                kind: QuestionKind::SingleChoice {
                    options: vec!["a".into(), "b".into()],
                    correct: 1,
                },
            },
            Question {
                prompt: "multi".into(),
                points: 1.0,
                kind: QuestionKind::MultiChoice {
                    options: vec!["a".into(), "b".into(), "c".into()],
                    correct: [0, 2].into_iter().collect(),
                },
            },
            Question {
                prompt: "fill".into(),
                points: 1.0,
                kind: QuestionKind::FillBlank(FillBlank {
                    full_text: "Paris is in France".into(),
                    blanked_text: FillBlank::blank_out("Paris is in France", &[0, 3]),
                    blank_word_indices: vec![0, 3],
                    decoy_words: Vec::new(),
                }),
            },
        ]
    }

    #[test]
    fn sheet_starts_neutral() {
        let sheet = AnswerSheet::new(&questions());
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.unanswered(), vec![0, 1, 2]);
    }

    #[test]
    fn select_replaces_previous_choice() {
        let mut sheet = AnswerSheet::new(&questions());
        sheet.select(0, 0).unwrap();
        sheet.select(0, 1).unwrap();
        assert_eq!(sheet.get(0), Some(&Answer::Choice(Some(1))));
    }

    #[test]
    fn toggle_flips_membership() {
        let mut sheet = AnswerSheet::new(&questions());
        sheet.toggle(1, 0).unwrap();
        sheet.toggle(1, 2).unwrap();
        sheet.toggle(1, 0).unwrap();
        assert_eq!(
            sheet.get(1),
            Some(&Answer::Selection([2].into_iter().collect()))
        );
    }

    #[test]
    fn set_blank_touches_one_slot() {
        let mut sheet = AnswerSheet::new(&questions());
        sheet.set_blank(2, 1, "France").unwrap();
        assert_eq!(
            sheet.get(2),
            Some(&Answer::Blanks(vec![None, Some("France".into())]))
        );
        // clearing with an empty word reverts the slot
        sheet.set_blank(2, 1, "").unwrap();
        assert_eq!(sheet.unanswered(), vec![0, 1, 2]);
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let mut sheet = AnswerSheet::new(&questions());
        assert!(sheet.toggle(0, 1).is_err());
        assert!(sheet.select(2, 0).is_err());
        assert!(sheet.set_blank(2, 9, "x").is_err());
        assert!(sheet.select(17, 0).is_err());
    }

    #[test]
    fn whitespace_only_blank_counts_as_unanswered() {
        let mut sheet = AnswerSheet::new(&questions());
        sheet.set_blank(2, 0, "  ").unwrap();
        assert!(sheet.unanswered().contains(&2));
    }
}
