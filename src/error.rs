use std::fmt;

/// Errors surfaced by quiz loading, the session state machine, and
/// result persistence. Scoring itself never fails: degenerate questions
/// contribute zero instead of erroring, so one bad question cannot sink
/// a whole submission.
#[derive(Debug)]
pub enum QuizError {
    /// Quiz document is not valid YAML or misses required fields.
    InvalidQuiz(String),
    /// A question violates an authoring invariant (too few options,
    /// out-of-range answer key, bad blank index).
    InvalidQuestion { index: usize, reason: String },
    /// Answer script entry does not match the question's type or bounds.
    InvalidAnswer { question: usize, reason: String },
    /// A flattened answer could not be mapped back to its typed shape.
    Deserialize { question: usize, reason: String },
    /// The linked course is not complete, so the quiz cannot be entered.
    AccessDenied { course: String },
    /// Writing the result record failed.
    Persist(String),
    /// I/O error reading a quiz or answer file.
    Io(String),
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::InvalidQuiz(reason) => write!(f, "invalid quiz: {}", reason),
            QuizError::InvalidQuestion { index, reason } => {
                write!(f, "invalid question {}: {}", index + 1, reason)
            }
            QuizError::InvalidAnswer { question, reason } => {
                write!(f, "invalid answer for question {}: {}", question + 1, reason)
            }
            QuizError::Deserialize { question, reason } => {
                write!(f, "cannot restore answer for question {}: {}", question + 1, reason)
            }
            QuizError::AccessDenied { course } => {
                write!(f, "course {} must be completed before taking this quiz", course)
            }
            QuizError::Persist(reason) => write!(f, "cannot persist result: {}", reason),
            QuizError::Io(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for QuizError {}

impl From<std::io::Error> for QuizError {
    fn from(e: std::io::Error) -> Self {
        QuizError::Io(e.to_string())
    }
}
