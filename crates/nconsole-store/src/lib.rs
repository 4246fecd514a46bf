//! State persistence for nconsole commands.
//!
//! Each persistent command owns one JSON file in the store directory, named
//! after the command. Saves go through a temp file and a rename so a crash
//! mid-write never leaves a half-written state file behind.

mod store;

pub use store::StateStore;
