//! Adapter implementations for the backend ports.

pub mod memory;
pub mod postgres;
