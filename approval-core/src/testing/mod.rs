//! Test support: in-memory database fixtures and catalog factories.

pub mod factories;
pub mod fixtures;
