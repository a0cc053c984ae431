use std::fs;
use std::path::Path;

use quizkit::loader;
use quizkit::model::Quiz;
use quizkit::persist::{FileResultStore, MemoryStore};
use quizkit::result::deserialize_answers;
use quizkit::session::{Phase, QuizSession};
use quizkit::{access, answer};

fn sample_quiz() -> Quiz {
    loader::load_quiz(Path::new("fixtures/sample_quiz.yaml")).expect("Cannot load fixture")
}

fn apply_sample_answers(session: &mut QuizSession) {
    let entries = loader::load_answer_script(Path::new("fixtures/sample_answers.yaml"))
        .expect("Cannot load script");
    for entry in entries {
        entry.apply(session).unwrap();
    }
}

#[test]
fn test_access_guard_gates_entry() {
    let quiz = sample_quiz();
    assert!(access::can_enter(&quiz, Some(100)));
    assert!(!access::can_enter(&quiz, Some(50)));
    assert!(!access::can_enter(&quiz, None));
}

#[test]
fn test_perfect_run_scores_100() {
    let mut session = QuizSession::new(sample_quiz(), Some("dana".into()), 1);
    apply_sample_answers(&mut session);
    assert!(session.unanswered().is_empty());

    assert!(session.request_submit(false));
    let result = session.result().unwrap();
    assert_eq!(result.score, 100);
    assert_eq!(result.answers, vec!["1", "0,2", "1", "Paris,France"]);
    assert_eq!(result.time_spent_seconds, Some(0));
}

#[test]
fn test_near_miss_blank_gets_half_credit() {
    let mut session = QuizSession::new(sample_quiz(), None, 1);
    apply_sample_answers(&mut session);
    // overwrite the first blank with a near-miss spelling
    session.set_blank(3, 0, "Pariss").unwrap();

    session.request_submit(false);
    // 5.5 of 6 points, rounded
    assert_eq!(session.result().unwrap().score, 92);
}

#[test]
fn test_result_round_trips_through_storage() {
    let quiz = sample_quiz();
    let mut session = QuizSession::new(quiz.clone(), None, 1);
    apply_sample_answers(&mut session);
    session.request_submit(false);

    let mut store = MemoryStore::default();
    let result = session.finish(&mut store).unwrap().clone();

    let restored = deserialize_answers(&result.answers, &quiz.questions).unwrap();
    assert_eq!(restored.len(), 4);
    assert_eq!(restored[0], answer::Answer::Choice(Some(1)));
    assert_eq!(
        restored[1],
        answer::Answer::Selection([0, 2].into_iter().collect())
    );
    assert_eq!(
        restored[3],
        answer::Answer::Blanks(vec![Some("Paris".into()), Some("France".into())])
    );
}

#[test]
fn test_submission_writes_result_file_and_event() {
    let tmp_dir = std::env::temp_dir().join("quizkit_test_session_flow");
    let _ = fs::remove_dir_all(&tmp_dir);

    let mut session = QuizSession::new(sample_quiz(), Some("dana".into()), 2);
    apply_sample_answers(&mut session);
    session.request_submit(false);

    let mut store = FileResultStore::new(tmp_dir.clone());
    session.finish(&mut store).unwrap();
    assert_eq!(session.phase(), Phase::Submitted);

    let yaml = fs::read_to_string(tmp_dir.join("capitals-attempt-2.yaml")).unwrap();
    assert!(yaml.contains("quiz_id: capitals"));
    assert!(yaml.contains("score: 100"));
    assert!(yaml.contains("user: dana"));
    assert!(yaml.contains("Paris,France"));

    let events = fs::read_to_string(tmp_dir.join("events.log")).unwrap();
    assert!(events.contains("quiz=capitals attempt=2 score=100"));
}

#[test]
fn test_expiry_and_manual_submit_race_yields_one_result() {
    let mut session = QuizSession::new(sample_quiz(), None, 1);
    apply_sample_answers(&mut session);

    // manual submit wins; the expiry-driven forced submit is a no-op
    assert!(session.request_submit(false));
    assert!(!session.request_submit(true));
    assert_eq!(session.handle_tick(), None);

    let mut store = MemoryStore::default();
    session.finish(&mut store).unwrap();
    assert_eq!(store.results.len(), 1);
    assert_eq!(store.events.len(), 1);
}

#[test]
fn test_unanswered_questions_simply_earn_zero() {
    let mut session = QuizSession::new(sample_quiz(), None, 1);
    // answer only the single-choice question
    session.select(0, 1).unwrap();
    assert_eq!(session.unanswered(), vec![1, 2, 3]);

    session.request_submit(true);
    // 1 of 6 points
    assert_eq!(session.result().unwrap().score, 17);
    assert_eq!(session.result().unwrap().answers, vec!["1", "", "", ","]);
}
