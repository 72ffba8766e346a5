//! Application layer orchestrating the pricing and loyalty rules.
//!
//! `TheaterService` loads snapshots from the storage ports, enforces the
//! preconditions the rules leave to their caller, and persists the results.
//! `Command` is the row shape of the batch interface.

pub mod command;
pub mod service;
