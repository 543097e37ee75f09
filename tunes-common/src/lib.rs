//! # Tunes Common Library
//!
//! Shared code for the tune finder:
//! - Catalog data model (`Tune`, `TuneSetting`)
//! - Bootstrap configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{Tune, TuneSetting};
