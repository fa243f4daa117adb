//! Core data structures shared by the evolution engine and its callers.

pub mod history;
pub mod neighbourhood;
