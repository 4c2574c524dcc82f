//! Core business logic for agora.

pub mod counters;
pub mod policy;
pub mod services;

pub use services::*;
