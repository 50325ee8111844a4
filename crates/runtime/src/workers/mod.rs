//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker is the single owner of the world; everything else
//! reaches it through commands.

mod simulation;

pub use simulation::{Command, SimulationWorker, WorkerSettings};
