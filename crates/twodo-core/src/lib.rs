pub mod error;
pub mod models;
pub mod config;
pub mod dates;
pub mod offset;
pub mod ids;
pub mod resolve;
pub mod highlight;
pub mod schedule;

pub use error::{Candidate, CandidateList, Result, TwodoError};
pub use models::{Due, Task, parse_tasks};
pub use config::{Config, DisplayConfig, OffsetConfig, TodoistConfig};
pub use dates::{DateAlias, Expansion, expand_date_alias, is_date_alias};
pub use offset::{AppliedOffset, OffsetOutcome, TimeOffset};
pub use ids::{IndexEntry, ShortIdIndex};
pub use resolve::{BatchResolution, PrefixResolver, Resolved};
pub use highlight::CharClass;
pub use schedule::{DueChange, Reminder, Schedule};
