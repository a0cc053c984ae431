//! Scoring engine: turns a question list and a frozen answer sheet into
//! a 0-100 percentage.
//!
//! Scoring never fails. Malformed questions (a fill-blank whose display
//! text ends up with no markers, say) contribute zero instead of
//! erroring, so a single bad question cannot take down a submission.

use crate::answer::{Answer, AnswerSheet};
use crate::model::{Question, QuestionKind};
use crate::similarity::similarity;

/// A blank word at or above this similarity earns full credit.
pub const FULL_CREDIT_SIMILARITY: f64 = 0.85;
/// A blank word at or above this (but below full) earns half credit.
pub const HALF_CREDIT_SIMILARITY: f64 = 0.70;

/// Overall percentage: `round(100 * earned / total)`, 0 for an empty or
/// zero-point quiz.
pub fn score(questions: &[Question], sheet: &AnswerSheet) -> u8 {
    let total: f64 = questions.iter().map(|q| q.points).sum();
    if total <= 0.0 {
        return 0;
    }

    let earned: f64 = questions
        .iter()
        .enumerate()
        .map(|(i, q)| grade_question(q, sheet.get(i)))
        .sum();

    (100.0 * earned / total).round() as u8
}

/// Points earned for one question. A missing or shape-mismatched answer
/// earns zero.
pub fn grade_question(question: &Question, answer: Option<&Answer>) -> f64 {
    match (&question.kind, answer) {
        (QuestionKind::SingleChoice { correct, .. }, Some(Answer::Choice(Some(sel)))) => {
            if sel == correct {
                question.points
            } else {
                0.0
            }
        }
        (QuestionKind::Boolean { correct }, Some(Answer::Choice(Some(sel)))) => {
            if *sel == usize::from(*correct) {
                question.points
            } else {
                0.0
            }
        }
        (QuestionKind::MultiChoice { correct, .. }, Some(Answer::Selection(sel))) => {
            // strict set equality, no credit for subsets or supersets
            if sel == correct {
                question.points
            } else {
                0.0
            }
        }
        (QuestionKind::FillBlank(fb), Some(Answer::Blanks(slots))) => {
            let total_blanks = fb.blank_count();
            if total_blanks == 0 {
                // degenerate authoring; yields zero rather than erroring
                return 0.0;
            }
            let points_per_blank = question.points / total_blanks as f64;
            let correct_words = fb.correct_words();

            correct_words
                .iter()
                .enumerate()
                .map(|(i, &correct)| {
                    let user = slots.get(i).and_then(|s| s.as_deref()).unwrap_or("");
                    points_per_blank * grade_blank(user, correct)
                })
                .sum()
        }
        _ => 0.0,
    }
}

/// Credit fraction for one blank: 1.0 for an exact or near-exact match,
/// 0.5 for a close miss, 0.0 otherwise.
fn grade_blank(user: &str, correct: &str) -> f64 {
    let user = user.trim().to_lowercase();
    let correct = correct.trim().to_lowercase();

    if user.is_empty() {
        return 0.0;
    }
    if user == correct {
        return 1.0;
    }

    let s = similarity(&user, &correct);
    if s >= FULL_CREDIT_SIMILARITY {
        1.0
    } else if s >= HALF_CREDIT_SIMILARITY {
        0.5
    } else {
        0.0
    }
}
