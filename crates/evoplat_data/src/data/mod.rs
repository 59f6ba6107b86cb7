//! Core data structures for the evoplat evaluator.

pub mod agent;
pub mod moves;
pub mod world;
