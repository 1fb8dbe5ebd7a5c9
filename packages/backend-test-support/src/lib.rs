//! Helpers shared by the backend's test binaries: one-time logging setup and
//! assertions on problem-details error bodies.

pub mod logging;
pub mod problem_details;
