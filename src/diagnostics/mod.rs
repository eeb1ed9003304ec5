//! Serializable timing traces attached to transform requests.

pub mod timing;

pub use timing::{StageTiming, TimingBreakdown};
