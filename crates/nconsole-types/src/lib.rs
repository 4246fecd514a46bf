//! Foundation types for nconsole.
//!
//! This crate contains the types shared by every nconsole crate: the error
//! enum, log severities and the console sink trait, the persisted command
//! state bag, and the console configuration.

pub mod config;
pub mod console;
pub mod error;
pub mod state;
