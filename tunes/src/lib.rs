//! tunes - find a tune on the catalog site and display one of its settings
//!
//! Library interface for the binary and for integration testing.

pub mod catalog_client;
pub mod error;
pub mod extractor;
pub mod notation;
pub mod render;
pub mod selection;
pub mod session;

pub use crate::error::{Result, TunesError};
pub use crate::session::{SessionOutcome, TuneSession, TuneSource};
