//! Turning typed short codes back into task ids.

use tracing::debug;

use crate::error::{Candidate, CandidateList, Result, TwodoError};
use crate::ids::{IndexEntry, ShortIdIndex};
use crate::models::Task;

/// Resolves exact codes or code prefixes against one [`ShortIdIndex`].
///
/// The resolver borrows the index, so every lookup in a batch sees the same
/// code assignment.
#[derive(Debug, Clone, Copy)]
pub struct PrefixResolver<'a> {
    index: &'a ShortIdIndex,
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub typed: String,
    pub code: &'a str,
    pub task: &'a Task,
}

impl Resolved<'_> {
    pub fn id(&self) -> &str {
        &self.task.id
    }
}

/// Outcome of resolving several codes; one failure never hides the others.
#[derive(Debug, Default)]
pub struct BatchResolution<'a> {
    pub resolved: Vec<Resolved<'a>>,
    pub failed: Vec<(String, TwodoError)>,
}

impl BatchResolution<'_> {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.resolved.iter().map(|r| r.task.id.as_str()).collect()
    }
}

impl ShortIdIndex {
    pub fn resolver(&self) -> PrefixResolver<'_> {
        PrefixResolver::new(self)
    }

    /// Shorthand for `self.resolver().resolve(typed)`.
    pub fn resolve(&self, typed: &str) -> Result<&str> {
        self.resolver().resolve(typed)
    }
}

impl<'a> PrefixResolver<'a> {
    pub fn new(index: &'a ShortIdIndex) -> Self {
        Self { index }
    }

    /// Long id for `typed`.
    ///
    /// An exact code wins even when it also prefixes longer codes. A full task
    /// id is accepted as well. Otherwise `typed` must prefix exactly one code.
    pub fn resolve(&self, typed: &str) -> Result<&'a str> {
        self.lookup(typed).map(|entry| entry.task.id.as_str())
    }

    pub fn resolve_task(&self, typed: &str) -> Result<&'a Task> {
        self.lookup(typed).map(|entry| &entry.task)
    }

    /// Resolve every code in `typed`, keeping successes and failures apart.
    pub fn resolve_all<I, S>(&self, typed: I) -> BatchResolution<'a>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut batch = BatchResolution::default();
        for raw in typed {
            let raw = raw.as_ref();
            match self.lookup(raw) {
                Ok(entry) => batch.resolved.push(Resolved {
                    typed: raw.to_string(),
                    code: &entry.code,
                    task: &entry.task,
                }),
                Err(e) => batch.failed.push((raw.to_string(), e)),
            }
        }
        batch
    }

    fn lookup(&self, typed: &str) -> Result<&'a IndexEntry> {
        let index: &'a ShortIdIndex = self.index;
        let code = typed.trim().to_lowercase();
        if code.is_empty() {
            return Err(not_found(typed));
        }

        if let Some(entry) = index.entry_for_code(&code) {
            return Ok(entry);
        }
        if let Some(entry) = index.entry_for_id(typed.trim()) {
            return Ok(entry);
        }

        let matches: Vec<&'a IndexEntry> = index
            .entries()
            .iter()
            .filter(|entry| entry.code.starts_with(&code))
            .collect();

        match matches.as_slice() {
            [] => Err(not_found(typed)),
            [only] => Ok(*only),
            many => {
                debug!("resolve: '{}' matches {} codes", typed, many.len());
                Err(TwodoError::Ambiguous {
                    code: typed.to_string(),
                    candidates: CandidateList(
                        many.iter()
                            .map(|entry| Candidate {
                                code: entry.code.clone(),
                                content: entry.task.display_content(),
                            })
                            .collect(),
                    ),
                })
            }
        }
    }
}

fn not_found(typed: &str) -> TwodoError {
    debug!("resolve: no code matches '{}'", typed);
    TwodoError::NotFound {
        code: typed.to_string(),
    }
}
