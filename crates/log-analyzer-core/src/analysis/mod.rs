mod aggregate;
mod stats;

pub use aggregate::UrlTimings;
pub use stats::{StatsComputer, UrlStats, select_top};
