//! Quiz-taking core: a session state machine over an answer sheet and a
//! countdown clock, a per-type scoring engine with fuzzy fill-blank
//! matching, and a flattening serializer for the stored result record.

pub mod access;
pub mod answer;
pub mod error;
pub mod loader;
pub mod model;
pub mod persist;
pub mod result;
pub mod score;
pub mod session;
pub mod similarity;
pub mod timer;
