//! API route modules.

pub mod generate;
pub mod share;
