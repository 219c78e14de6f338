//! Request handlers

pub mod billing;
pub mod reports;
pub mod health;
