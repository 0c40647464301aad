//! Small shared UI helpers.

pub mod auth;
pub mod money;
