//! Quiz documents and answer scripts are YAML. Parsing goes through raw
//! serde structs first, then validation turns them into the typed model
//! so every quiz that loads satisfies the authoring invariants.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::QuizError;
use crate::model::{FillBlank, Question, QuestionKind, Quiz};
use crate::persist::compute_hash;
use crate::session::QuizSession;

#[derive(Debug, Deserialize)]
struct RawQuiz {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    course: Option<String>,
    #[serde(default)]
    time_limit_minutes: Option<u32>,
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawQuestion {
    #[serde(rename = "single")]
    Single {
        prompt: String,
        options: Vec<String>,
        correct: usize,
        #[serde(default = "default_points")]
        points: f64,
    },
    #[serde(rename = "multi")]
    Multi {
        prompt: String,
        options: Vec<String>,
        correct: Vec<usize>,
        #[serde(default = "default_points")]
        points: f64,
    },
    #[serde(rename = "boolean")]
    Boolean {
        prompt: String,
        correct: bool,
        #[serde(default = "default_points")]
        points: f64,
    },
    #[serde(rename = "fill")]
    Fill {
        prompt: String,
        text: String,
        blanks: Vec<usize>,
        #[serde(default)]
        blanked_text: Option<String>,
        #[serde(default)]
        decoys: Vec<String>,
        #[serde(default = "default_points")]
        points: f64,
    },
}

fn default_points() -> f64 {
    1.0
}

/// Read and validate a quiz file, attaching its SHA-256 hash.
pub fn load_quiz(path: &Path) -> Result<Quiz, QuizError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| QuizError::Io(format!("cannot read {}: {}", path.display(), e)))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    parse_quiz(&content, &file_name, &compute_hash(content.as_bytes()))
}

/// Parse and validate a quiz document.
pub fn parse_quiz(content: &str, quiz_file: &str, quiz_hash: &str) -> Result<Quiz, QuizError> {
    let raw: RawQuiz =
        serde_yaml::from_str(content).map_err(|e| QuizError::InvalidQuiz(e.to_string()))?;

    if raw.questions.is_empty() {
        return Err(QuizError::InvalidQuiz("quiz has no questions".into()));
    }

    let questions = raw
        .questions
        .into_iter()
        .map(convert_question)
        .collect::<Vec<_>>();

    for (i, q) in questions.iter().enumerate() {
        q.check(i)?;
    }

    Ok(Quiz {
        title: raw.title.unwrap_or_else(|| raw.id.clone()),
        id: raw.id,
        questions,
        time_limit_minutes: raw.time_limit_minutes,
        course_id: raw.course,
        quiz_file: quiz_file.to_string(),
        quiz_hash: quiz_hash.to_string(),
    })
}

fn convert_question(raw: RawQuestion) -> Question {
    match raw {
        RawQuestion::Single {
            prompt,
            options,
            correct,
            points,
        } => Question {
            prompt,
            points,
            kind: QuestionKind::SingleChoice { options, correct },
        },
        RawQuestion::Multi {
            prompt,
            options,
            correct,
            points,
        } => Question {
            prompt,
            points,
            kind: QuestionKind::MultiChoice {
                options,
                correct: correct.into_iter().collect::<BTreeSet<_>>(),
            },
        },
        RawQuestion::Boolean {
            prompt,
            correct,
            points,
        } => Question {
            prompt,
            points,
            kind: QuestionKind::Boolean { correct },
        },
        RawQuestion::Fill {
            prompt,
            text,
            blanks,
            blanked_text,
            decoys,
            points,
        } => {
            let blanked_text =
                blanked_text.unwrap_or_else(|| FillBlank::blank_out(&text, &blanks));
            Question {
                prompt,
                points,
                kind: QuestionKind::FillBlank(FillBlank {
                    full_text: text,
                    blanked_text,
                    blank_word_indices: blanks,
                    decoy_words: decoys,
                }),
            }
        }
    }
}

/// One scripted answer action, standing in for a UI event. Exactly one
/// of the action fields must be set.
#[derive(Debug, Deserialize)]
pub struct ScriptEntry {
    pub question: usize,
    #[serde(default)]
    pub select: Option<usize>,
    #[serde(default)]
    pub toggle: Option<Vec<usize>>,
    #[serde(default)]
    pub blanks: Option<Vec<String>>,
}

impl ScriptEntry {
    pub fn apply(&self, session: &mut QuizSession) -> Result<(), QuizError> {
        session.go_to(self.question);
        match (&self.select, &self.toggle, &self.blanks) {
            (Some(option), None, None) => session.select(self.question, *option),
            (None, Some(options), None) => {
                for &option in options {
                    session.toggle(self.question, option)?;
                }
                Ok(())
            }
            (None, None, Some(words)) => {
                for (blank, word) in words.iter().enumerate() {
                    if !word.is_empty() {
                        session.set_blank(self.question, blank, word)?;
                    }
                }
                Ok(())
            }
            _ => Err(QuizError::InvalidAnswer {
                question: self.question,
                reason: "entry must set exactly one of select, toggle, blanks".into(),
            }),
        }
    }
}

/// Read a YAML list of answer actions.
pub fn load_answer_script(path: &Path) -> Result<Vec<ScriptEntry>, QuizError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| QuizError::Io(format!("cannot read {}: {}", path.display(), e)))?;
    serde_yaml::from_str(&content).map_err(|e| QuizError::InvalidQuiz(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
id: capitals
title: European Capitals
course: geo-101
time_limit_minutes: 10
questions:
  - type: single
    prompt: Capital of France?
    options: [London, Paris, Rome]
    correct: 1
  - type: fill
    prompt: Fill in the blank
    text: Paris is the capital of France
    blanks: [0]
    decoys: [London]
    points: 2
"#;

    #[test]
    fn parses_a_valid_quiz() {
        let quiz = parse_quiz(SAMPLE, "capitals.yaml", "sha256:x").unwrap();
        assert_eq!(quiz.id, "capitals");
        assert_eq!(quiz.course_id.as_deref(), Some("geo-101"));
        assert_eq!(quiz.time_limit_seconds(), Some(600));
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].points, 1.0);
        assert_eq!(quiz.questions[1].points, 2.0);

        match &quiz.questions[1].kind {
            QuestionKind::FillBlank(fb) => {
                assert_eq!(fb.blanked_text, "_____ is the capital of France");
                assert_eq!(fb.correct_words(), vec!["Paris"]);
            }
            other => panic!("expected fill-blank, got {:?}", other),
        }
    }

    #[test]
    fn title_falls_back_to_id() {
        let quiz = parse_quiz(
            "id: q\nquestions:\n  - type: boolean\n    prompt: sure?\n    correct: true\n",
            "q.yaml",
            "sha256:x",
        )
        .unwrap();
        assert_eq!(quiz.title, "q");
        assert!(quiz.course_id.is_none());
        assert!(quiz.time_limit_minutes.is_none());
    }

    #[test]
    fn rejects_empty_quiz() {
        let err = parse_quiz("id: q\nquestions: []\n", "q.yaml", "sha256:x").unwrap_err();
        assert!(err.to_string().contains("no questions"));
    }

    #[test]
    fn rejects_out_of_range_answer_key() {
        let doc = r#"
id: q
questions:
  - type: single
    prompt: pick
    options: [a, b]
    correct: 5
"#;
        assert!(parse_quiz(doc, "q.yaml", "sha256:x").is_err());
    }

    #[test]
    fn rejects_bad_blank_index() {
        let doc = r#"
id: q
questions:
  - type: fill
    prompt: fill
    text: two words
    blanks: [9]
"#;
        assert!(parse_quiz(doc, "q.yaml", "sha256:x").is_err());
    }

    #[test]
    fn script_entry_requires_one_action() {
        let quiz = parse_quiz(SAMPLE, "capitals.yaml", "sha256:x").unwrap();
        let mut session = QuizSession::new(quiz, None, 1);

        let entry = ScriptEntry {
            question: 0,
            select: Some(1),
            toggle: None,
            blanks: Some(vec!["Paris".into()]),
        };
        assert!(entry.apply(&mut session).is_err());

        let entry = ScriptEntry {
            question: 0,
            select: Some(1),
            toggle: None,
            blanks: None,
        };
        entry.apply(&mut session).unwrap();
        assert_eq!(session.unanswered(), vec![1]);
    }

    #[test]
    fn script_parses_from_yaml() {
        let doc = r#"
- question: 0
  select: 1
- question: 1
  blanks: ["Paris"]
"#;
        let entries: Vec<ScriptEntry> = serde_yaml::from_str(doc).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].select, Some(1));
        assert_eq!(entries[1].blanks.as_deref(), Some(&["Paris".to_string()][..]));
    }
}
