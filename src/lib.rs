//! playgate: run ansible playbooks and ad-hoc commands against inventory
//! groups behind a preflight safety gate.
//!
//! Hosts are probed for reachability first, production-like groups require a
//! typed confirmation, and every attempt is written to an append-only audit
//! log.

pub mod audit;
pub mod config;
pub mod error;
pub mod executor;
pub mod gate;
pub mod inventory;
pub mod orchestrator;
pub mod probe;
pub mod ui;

pub use error::{PlaygateError, Result};
pub use orchestrator::{Orchestrator, RunOutcome, RunReport, RunRequest};
