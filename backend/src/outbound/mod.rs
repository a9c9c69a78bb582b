//! Outbound adapters implementing the domain ports.

pub mod hashing;
pub mod persistence;
pub mod render;
