//! ttycam-client library entry point.
//!
//! The binary entry point in `main.rs` wires these modules together; they
//! live in a library crate so each seam stays unit-testable.

pub mod audio;
pub mod capture;
pub mod config;
pub mod session;
pub mod terminal;
