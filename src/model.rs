use std::collections::BTreeSet;

use crate::error::QuizError;

/// Marker standing in for a withheld word in a fill-blank question's
/// display text.
pub const BLANK_MARKER: &str = "_____";

/// An immutable quiz definition. Authored externally; never mutated
/// during a session.
#[derive(Debug, Clone)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub questions: Vec<Question>,
    /// Absent means untimed: no countdown is constructed.
    pub time_limit_minutes: Option<u32>,
    /// Absent means ungated: the access guard always admits.
    pub course_id: Option<String>,
    pub quiz_file: String,
    pub quiz_hash: String,
}

impl Quiz {
    pub fn time_limit_seconds(&self) -> Option<u32> {
        self.time_limit_minutes.map(|m| m * 60)
    }

    pub fn total_points(&self) -> f64 {
        self.questions.iter().map(|q| q.points).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Question {
    pub prompt: String,
    pub points: f64,
    pub kind: QuestionKind,
}

/// The four supported question types. Scoring and serialization both
/// match exhaustively on this, so a new type cannot be added without
/// updating them.
#[derive(Debug, Clone)]
pub enum QuestionKind {
    SingleChoice {
        options: Vec<String>,
        correct: usize,
    },
    MultiChoice {
        options: Vec<String>,
        correct: BTreeSet<usize>,
    },
    Boolean {
        correct: bool,
    },
    FillBlank(FillBlank),
}

#[derive(Debug, Clone)]
pub struct FillBlank {
    /// Complete sentence with every word present.
    pub full_text: String,
    /// Display text with the withheld words replaced by [`BLANK_MARKER`].
    pub blanked_text: String,
    /// Positions (into `full_text` split on whitespace) of the withheld
    /// words, left to right.
    pub blank_word_indices: Vec<usize>,
    /// Extra word-bank entries that belong to no blank.
    pub decoy_words: Vec<String>,
}

impl FillBlank {
    /// The words the user must supply, in left-to-right blank order.
    pub fn correct_words(&self) -> Vec<&str> {
        let words: Vec<&str> = self.full_text.split_whitespace().collect();
        self.blank_word_indices
            .iter()
            .filter_map(|&i| words.get(i).copied())
            .collect()
    }

    /// Number of blank markers actually present in the display text.
    /// Authoring errors can make this zero even when indices are given.
    pub fn blank_count(&self) -> usize {
        self.blanked_text.matches(BLANK_MARKER).count()
    }

    /// Word bank shown to the user: the withheld words plus decoys.
    pub fn word_bank(&self) -> Vec<String> {
        let mut bank: Vec<String> = self
            .correct_words()
            .into_iter()
            .map(|w| w.to_string())
            .collect();
        bank.extend(self.decoy_words.iter().cloned());
        bank.sort();
        bank
    }

    /// Derive the display text from the full text and blank indices.
    pub fn blank_out(full_text: &str, indices: &[usize]) -> String {
        full_text
            .split_whitespace()
            .enumerate()
            .map(|(i, w)| if indices.contains(&i) { BLANK_MARKER } else { w })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Question {
    /// Short type tag used in serialized records and logs.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            QuestionKind::SingleChoice { .. } => "single",
            QuestionKind::MultiChoice { .. } => "multi",
            QuestionKind::Boolean { .. } => "boolean",
            QuestionKind::FillBlank(_) => "fill",
        }
    }

    /// Enforce the authoring invariants for this question. `index` is
    /// only used for error reporting.
    pub fn check(&self, index: usize) -> Result<(), QuizError> {
        let fail = |reason: String| QuizError::InvalidQuestion { index, reason };

        if self.points <= 0.0 {
            return Err(fail(format!("points must be positive, got {}", self.points)));
        }

        match &self.kind {
            QuestionKind::SingleChoice { options, correct } => {
                if options.len() < 2 {
                    return Err(fail("choice questions need at least 2 options".into()));
                }
                if *correct >= options.len() {
                    return Err(fail(format!(
                        "correct option {} out of range (have {} options)",
                        correct,
                        options.len()
                    )));
                }
            }
            QuestionKind::MultiChoice { options, correct } => {
                if options.len() < 2 {
                    return Err(fail("choice questions need at least 2 options".into()));
                }
                if let Some(&bad) = correct.iter().find(|&&c| c >= options.len()) {
                    return Err(fail(format!(
                        "correct option {} out of range (have {} options)",
                        bad,
                        options.len()
                    )));
                }
            }
            QuestionKind::Boolean { .. } => {}
            QuestionKind::FillBlank(fb) => {
                let word_count = fb.full_text.split_whitespace().count();
                if let Some(&bad) = fb.blank_word_indices.iter().find(|&&i| i >= word_count) {
                    return Err(fail(format!(
                        "blank word index {} out of range (text has {} words)",
                        bad, word_count
                    )));
                }
            }
        }
        Ok(())
    }
}
