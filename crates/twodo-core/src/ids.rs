//! Short task codes
//!
//! Remote task ids are long and opaque. For one command invocation we hand out
//! short base-36 codes (2-4 characters in practice) derived from a hash of each
//! id, probing with a numeric suffix on collision. Codes only mean something for the index that
//! issued them; a rebuilt index may assign them differently.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::models::Task;

/// Number of hash buckets before suffixing (36^3).
pub const HASH_BUCKETS: u32 = 46_656;

pub const MIN_CODE_LEN: usize = 2;

/// Longest code handed out while no bucket collides more than 36 times.
///
/// This is not a hard cap: past that point probing moves on to two-digit
/// counters and codes widen to 5 characters or more, so they stay unique.
pub const MAX_CODE_LEN: usize = 4;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 32-bit polynomial rolling hash (`h * 31 + unit`) over the UTF-16 units of `id`,
/// folded into [`HASH_BUCKETS`].
pub fn id_hash(id: &str) -> u32 {
    let hash = id
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs() % HASH_BUCKETS
}

/// Render `value` in lower-case base 36.
pub fn to_base36(mut value: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

/// Hash-derived code for `id` before collision handling.
pub fn base_code(id: &str) -> String {
    let code = to_base36(id_hash(id));
    format!("{:0>width$}", code, width = MIN_CODE_LEN)
}

#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub code: String,
    pub task: Task,
}

/// Bidirectional mapping between short codes and task ids for one snapshot.
#[derive(Debug, Clone, Default)]
pub struct ShortIdIndex {
    entries: Vec<IndexEntry>,
    by_code: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl ShortIdIndex {
    /// Assign a code to every task in `tasks`.
    ///
    /// Tasks are processed oldest first (stable on `created_at`), so the same
    /// set of tasks yields the same codes whatever order it arrives in.
    /// A task id appearing more than once keeps its first code.
    pub fn build(tasks: &[Task]) -> Self {
        let mut ordered: Vec<&Task> = tasks.iter().collect();
        ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let mut index = Self {
            entries: Vec::with_capacity(ordered.len()),
            by_code: HashMap::with_capacity(ordered.len()),
            by_id: HashMap::with_capacity(ordered.len()),
        };
        let mut collisions = 0usize;

        for task in ordered {
            if index.by_id.contains_key(&task.id) {
                trace!("ids: duplicate task id {} ignored", task.id);
                continue;
            }

            let base = base_code(&task.id);
            let code = if index.by_code.contains_key(&base) {
                collisions += 1;
                let probed = index.probe(&base);
                trace!("ids: {} collided on '{}', assigned '{}'", task.id, base, probed);
                probed
            } else {
                base
            };

            let position = index.entries.len();
            index.by_code.insert(code.clone(), position);
            index.by_id.insert(task.id.clone(), position);
            index.entries.push(IndexEntry {
                code,
                task: task.clone(),
            });
        }

        debug!(
            "ids: indexed {} tasks ({} collisions)",
            index.entries.len(),
            collisions
        );
        index
    }

    /// First unused `base + counter` with counter counting up in base 36 from 0.
    fn probe(&self, base: &str) -> String {
        (0u32..)
            .map(|counter| format!("{}{}", base, to_base36(counter)))
            .find(|candidate| !self.by_code.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in assignment order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn id_for(&self, code: &str) -> Option<&str> {
        self.by_code
            .get(code)
            .map(|&i| self.entries[i].task.id.as_str())
    }

    pub fn code_for(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(|&i| self.entries[i].code.as_str())
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.by_id.get(id).map(|&i| &self.entries[i].task)
    }

    pub(crate) fn entry_for_code(&self, code: &str) -> Option<&IndexEntry> {
        self.by_code.get(code).map(|&i| &self.entries[i])
    }

    pub(crate) fn entry_for_id(&self, id: &str) -> Option<&IndexEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// Whether `typed` is a code or a prefix of one.
    pub fn matches_any(&self, typed: &str) -> bool {
        let typed = typed.trim().to_lowercase();
        !typed.is_empty() && self.entries.iter().any(|e| e.code.starts_with(&typed))
    }
}
