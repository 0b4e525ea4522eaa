//! Domain types shared by the clubinho SDK crates.
//!
//! Everything here is pure data: query state, page envelopes, sort and
//! filter descriptions, mutation outcomes and the typed records of the
//! platform's managed resources. No I/O happens in this crate.

mod domain;
pub use domain::*;

pub mod records;
pub mod resources;
