//! Library entry point for the vuesweep CLI.

pub mod classify;
pub mod cleaner;
pub mod commands;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod scanner;
pub mod session;
pub mod utils;
