//! Visitor intake agent
//!
//! The conversation state controller for the doorman: it tracks which
//! visitor details have been collected, gates the resident directory
//! check, and sends the admin notification once per confirmed visit.

pub mod controller;
pub mod prompts;
pub mod session;
pub mod tools;

pub use controller::{IntakeController, IntakeSnapshot};
pub use session::{IntakeSession, TurnOutcome};
pub use tools::intake_tool_definitions;
