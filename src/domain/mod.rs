pub mod balance;
pub mod error;
pub mod limits;

pub use balance::{BalanceSummary, EntryKind, summarize};
pub use error::Error;
pub use limits::{Allowance, DayLimits};
