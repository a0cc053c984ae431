//! One attempt at a quiz: current-question pointer, the answer sheet,
//! the countdown, and the submission phase. The phase enum guards the
//! single submission mutation point, so the manual-submit vs
//! timer-expiry race always produces exactly one result.

use chrono::Utc;

use crate::answer::AnswerSheet;
use crate::error::QuizError;
use crate::model::Quiz;
use crate::persist::ResultStore;
use crate::result::{serialize_answers, QuizResult};
use crate::score;
use crate::timer::{Countdown, TimerSignal};

/// Submission phase. Transitions run strictly forward:
/// `InProgress → Submitting → Submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Submitting,
    Submitted,
}

pub struct QuizSession {
    quiz: Quiz,
    current: usize,
    sheet: AnswerSheet,
    countdown: Option<Countdown>,
    phase: Phase,
    user: Option<String>,
    attempt: u32,
    result: Option<QuizResult>,
}

impl QuizSession {
    /// Start an attempt. The caller is expected to have passed the
    /// access guard already; the session does not re-check it. A timed
    /// quiz gets its countdown started here; a zero-length time limit
    /// expires immediately and auto-submits.
    pub fn new(quiz: Quiz, user: Option<String>, attempt: u32) -> Self {
        let sheet = AnswerSheet::new(&quiz.questions);
        let countdown = quiz.time_limit_seconds().map(Countdown::new);

        let mut session = Self {
            quiz,
            current: 0,
            sheet,
            countdown,
            phase: Phase::InProgress,
            user,
            attempt,
            result: None,
        };

        if let Some(cd) = session.countdown.as_mut() {
            if cd.start() == Some(TimerSignal::Expired) {
                session.request_submit(true);
            }
        }

        session
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_question(&self) -> usize {
        self.current
    }

    pub fn sheet(&self) -> &AnswerSheet {
        &self.sheet
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        self.countdown.as_ref().map(|cd| cd.remaining())
    }

    /// Indices of questions still unanswered. The UI uses this to ask
    /// for confirmation before a non-forced submit; the state machine
    /// itself never blocks on it.
    pub fn unanswered(&self) -> Vec<usize> {
        self.sheet.unanswered()
    }

    /// The result built at submission, if any.
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Move the question pointer, clamped to valid bounds. Navigation
    /// needs no answer-completeness check.
    pub fn go_to(&mut self, index: usize) {
        if self.phase != Phase::InProgress || self.quiz.questions.is_empty() {
            return;
        }
        self.current = index.min(self.quiz.questions.len() - 1);
    }

    /// Replace the selection of a single-choice or boolean question.
    pub fn select(&mut self, question: usize, option: usize) -> Result<(), QuizError> {
        self.ensure_in_progress(question)?;
        self.sheet.select(question, option)
    }

    /// Toggle one option of a multi-choice question.
    pub fn toggle(&mut self, question: usize, option: usize) -> Result<(), QuizError> {
        self.ensure_in_progress(question)?;
        self.sheet.toggle(question, option)
    }

    /// Fill one blank of a fill-blank question.
    pub fn set_blank(
        &mut self,
        question: usize,
        blank: usize,
        word: &str,
    ) -> Result<(), QuizError> {
        self.ensure_in_progress(question)?;
        self.sheet.set_blank(question, blank, word)
    }

    /// Drive the countdown by one second. On the expiring tick the
    /// session force-submits itself, synchronously.
    pub fn handle_tick(&mut self) -> Option<TimerSignal> {
        if self.phase != Phase::InProgress {
            return None;
        }
        let signal = self.countdown.as_mut()?.tick();
        if signal == Some(TimerSignal::Expired) {
            self.request_submit(true);
        }
        signal
    }

    /// Enter the `Submitting` phase: stop the clock, score the frozen
    /// answers and build the result record. Idempotent — the losing
    /// side of the manual/auto race gets `false` and nothing happens.
    /// `forced` marks timer-driven and confirmation-bypassing submits;
    /// the caller handles any unanswered-question confirmation first.
    pub fn request_submit(&mut self, forced: bool) -> bool {
        if self.phase != Phase::InProgress {
            return false;
        }
        self.phase = Phase::Submitting;

        let time_spent = match (self.quiz.time_limit_seconds(), self.countdown.as_mut()) {
            (Some(limit), Some(cd)) => {
                cd.stop();
                Some(limit - cd.remaining())
            }
            _ => None,
        };

        let open = self.sheet.unanswered().len();
        if forced && open > 0 {
            log::warn!(
                "forced submission of {:?} with {} unanswered question(s)",
                self.quiz.id,
                open
            );
        }

        let score = score::score(&self.quiz.questions, &self.sheet);
        self.result = Some(QuizResult {
            quiz_id: self.quiz.id.clone(),
            quiz_hash: self.quiz.quiz_hash.clone(),
            user: self.user.clone(),
            attempt: self.attempt,
            answers: serialize_answers(self.sheet.answers()),
            score,
            completed_at: Utc::now(),
            time_spent_seconds: time_spent,
        });

        true
    }

    /// Hand the result to the persistence collaborator and move to
    /// `Submitted`. If the primary write fails the session stays in
    /// `Submitting` and the error propagates, so the caller can retry
    /// or notify. The duplicate analytics record is fire-and-forget:
    /// its failure is logged and swallowed.
    pub fn finish(&mut self, store: &mut dyn ResultStore) -> Result<&QuizResult, QuizError> {
        if self.phase != Phase::Submitting {
            return Err(QuizError::Persist(format!(
                "nothing to persist in phase {:?}",
                self.phase
            )));
        }
        let result = match self.result.as_ref() {
            Some(result) => result,
            None => return Err(QuizError::Persist("no result was built".into())),
        };

        store.save_result(result)?;

        if let Err(e) = store.record_event(result) {
            log::warn!("analytics event for {:?} dropped: {}", result.quiz_id, e);
        }

        self.phase = Phase::Submitted;
        Ok(result)
    }

    fn ensure_in_progress(&self, question: usize) -> Result<(), QuizError> {
        if self.phase == Phase::InProgress {
            Ok(())
        } else {
            Err(QuizError::InvalidAnswer {
                question,
                reason: "answers are frozen once submission starts".into(),
            })
        }
    }
}
