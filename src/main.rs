mod cli;

use clap::Parser;

use quizkit::error::QuizError;
use quizkit::persist::FileResultStore;
use quizkit::session::{Phase, QuizSession};
use quizkit::{access, loader, timer};

use crate::cli::Cli;

fn main() {
    pretty_env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), QuizError> {
    let cli = Cli::parse();

    let quiz = loader::load_quiz(&cli.quiz)?;

    if cli.check {
        println!("OK: {} ({} questions)", quiz.title, quiz.questions.len());
        return Ok(());
    }

    if !access::can_enter(&quiz, cli.progress) {
        return Err(QuizError::AccessDenied {
            course: quiz.course_id.unwrap_or_default(),
        });
    }

    let timed = quiz.time_limit_seconds().is_some();
    let quiz_title = quiz.title.clone();
    let mut session = QuizSession::new(quiz, cli.user.clone(), cli.attempt);

    // Live 1 Hz pulses keep the deadline honest even for scripted runs.
    let ticker = timed.then(timer::spawn_ticker);

    if let Some(ref script_path) = cli.answers {
        for entry in loader::load_answer_script(script_path)? {
            if let Some(ref rx) = ticker {
                while rx.try_recv().is_ok() {
                    session.handle_tick();
                }
            }
            if session.phase() != Phase::InProgress {
                log::warn!("time expired before the answer script finished");
                break;
            }
            entry.apply(&mut session)?;
        }
    }

    if session.phase() == Phase::InProgress {
        let open = session.unanswered();
        if !open.is_empty() {
            // a non-interactive run has nobody to confirm with
            log::info!("submitting with {} unanswered question(s)", open.len());
            session.request_submit(true);
        } else {
            session.request_submit(false);
        }
    }

    let mut store = FileResultStore::new(cli.out.unwrap_or_else(FileResultStore::default_dir));
    let result = session.finish(&mut store)?;

    println!("Quiz: {}", quiz_title);
    println!("Score: {}%", result.score);
    if let Some(spent) = result.time_spent_seconds {
        println!("Time spent: {}s", spent);
    }
    println!("Attempt {} recorded at {}", result.attempt, result.completed_at.to_rfc3339());

    Ok(())
}
