use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "quizkit", version, about = "Timed quiz runner and scorer")]
pub struct Cli {
    /// Path to the quiz YAML file
    pub quiz: PathBuf,

    /// Answer script to replay (YAML list of actions)
    #[arg(long, value_name = "path")]
    pub answers: Option<PathBuf>,

    /// Completion percentage of the linked course, as reported by the
    /// platform
    #[arg(long, value_name = "percent")]
    pub progress: Option<u32>,

    /// User name attached to the result
    #[arg(long)]
    pub user: Option<String>,

    /// Attempt number recorded with the result
    #[arg(long, default_value_t = 1)]
    pub attempt: u32,

    /// Results directory [default: per-user data dir]
    #[arg(long, value_name = "dir")]
    pub out: Option<PathBuf>,

    /// Validate the quiz file and exit without running it
    #[arg(long)]
    pub check: bool,
}
