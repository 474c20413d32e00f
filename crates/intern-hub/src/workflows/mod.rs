//! Workflow modules exposed by the core crate.

pub mod directory;
