//! Evoplat client library: connects an evaluator to a remote GA optimizer.

pub mod app;
pub mod client;
