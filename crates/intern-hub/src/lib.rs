//! Core building blocks for the InternHub internship directory service:
//! configuration, telemetry, and the directory workflow (accounts, profiles,
//! admin review, and public search).

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
