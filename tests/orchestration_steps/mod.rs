//! Step definitions for orchestration behaviour scenarios.

mod given;
mod then;
mod when;
pub mod world;
