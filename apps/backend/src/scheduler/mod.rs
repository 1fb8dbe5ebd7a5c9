//! Time-based round driver.

pub mod schedule;
pub mod trigger;

pub use schedule::{ScheduleError, WeeklySchedule};
pub use trigger::{RoundTrigger, TriggerHandles, TriggerOutcome};
