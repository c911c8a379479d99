use std::fmt;

use thiserror::Error;

/// One entry of an ambiguous short-code lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub code: String,
    pub content: String,
}

/// Newline-separated `code - "content"` listing used in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList(pub Vec<Candidate>);

impl fmt::Display for CandidateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for candidate in &self.0 {
            writeln!(f, "    {} - \"{}\"", candidate.code, candidate.content)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum TwodoError {
    #[error(
        "No task found matching '{code}'\n\nShort IDs change whenever the task list changes. List your tasks again to see the current IDs."
    )]
    NotFound { code: String },

    #[error("Ambiguous ID '{code}' matches multiple tasks:\n{candidates}\nUse a longer prefix to disambiguate.")]
    Ambiguous {
        code: String,
        candidates: CandidateList,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid task snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl TwodoError {
    /// Candidates of an ambiguous lookup, empty for every other variant.
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            TwodoError::Ambiguous { candidates, .. } => &candidates.0,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, TwodoError>;
