pub mod playability;
pub mod policy;
pub mod reports;
pub mod schedule;
pub mod seeds;

pub use playability::{PlayabilityRecord, failed_records, run_playability_analysis};
pub use schedule::{ScheduleReport, inspect_schedule, parse_instant};
pub use seeds::resolve_seeds;
