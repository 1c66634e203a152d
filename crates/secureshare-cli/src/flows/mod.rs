//! Per-page flow state machines.
//!
//! Each page of the product maps to one module here, kept free of terminal
//! I/O so the contracts (preconditions, state transitions, error surfaces)
//! are unit-testable. The binary renders them.

pub mod audit;
pub mod dashboard;
pub mod download;
pub mod upload;
