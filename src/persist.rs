use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::QuizError;
use crate::result::QuizResult;

/// External persistence collaborator. The session hands every result to
/// `save_result` (failure propagates) and mirrors it to `record_event`
/// for downstream analytics (failure is the caller's to swallow).
pub trait ResultStore {
    fn save_result(&mut self, result: &QuizResult) -> Result<(), QuizError>;
    fn record_event(&mut self, result: &QuizResult) -> Result<(), QuizError>;
}

/// File-backed store: one YAML document per attempt plus an append-only
/// event log, written under a results directory.
pub struct FileResultStore {
    dir: PathBuf,
}

impl FileResultStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Default per-user results directory.
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "quizkit")
            .map(|dirs| dirs.data_dir().join("results"))
            .unwrap_or_else(|| PathBuf::from("quizkit-results"))
    }

    fn result_path(&self, result: &QuizResult) -> PathBuf {
        self.dir
            .join(format!("{}-attempt-{}.yaml", result.quiz_id, result.attempt))
    }
}

impl ResultStore for FileResultStore {
    fn save_result(&mut self, result: &QuizResult) -> Result<(), QuizError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| QuizError::Persist(format!("cannot create results dir: {}", e)))?;

        let yaml = serde_yaml::to_string(result)
            .map_err(|e| QuizError::Persist(format!("cannot encode result: {}", e)))?;
        atomic_write(&self.result_path(result), &yaml)
    }

    fn record_event(&mut self, result: &QuizResult) -> Result<(), QuizError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| QuizError::Persist(format!("cannot create results dir: {}", e)))?;

        let line = format!(
            "{} quiz={} attempt={} score={}\n",
            result.completed_at.to_rfc3339(),
            result.quiz_id,
            result.attempt,
            result.score
        );
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join("events.log"))
            .map_err(|e| QuizError::Persist(format!("cannot open event log: {}", e)))?;
        file.write_all(line.as_bytes())
            .map_err(|e| QuizError::Persist(format!("cannot append event: {}", e)))?;
        Ok(())
    }
}

/// In-memory store for tests; can be told to fail either write path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub results: Vec<QuizResult>,
    pub events: Vec<QuizResult>,
    pub fail_results: bool,
    pub fail_events: bool,
}

impl ResultStore for MemoryStore {
    fn save_result(&mut self, result: &QuizResult) -> Result<(), QuizError> {
        if self.fail_results {
            return Err(QuizError::Persist("result store unavailable".into()));
        }
        self.results.push(result.clone());
        Ok(())
    }

    fn record_event(&mut self, result: &QuizResult) -> Result<(), QuizError> {
        if self.fail_events {
            return Err(QuizError::Persist("event sink unavailable".into()));
        }
        self.events.push(result.clone());
        Ok(())
    }
}

fn atomic_write(path: &Path, content: &str) -> Result<(), QuizError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)
        .map_err(|e| QuizError::Persist(format!("cannot write {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path).map_err(|e| QuizError::Persist(format!("cannot rename: {}", e)))?;
    Ok(())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// SHA-256 of a quiz file, carried into each result record so a graded
/// attempt can be matched to the exact quiz revision it was taken from.
pub fn compute_file_hash(path: &Path) -> Result<String, QuizError> {
    let content = fs::read(path)
        .map_err(|e| QuizError::Io(format!("cannot read {}: {}", path.display(), e)))?;
    Ok(compute_hash(&content))
}

pub fn compute_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{}", hex_encode(&hasher.finalize()))
}
