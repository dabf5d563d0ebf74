//! healthline library - exposes the CLI pieces for integration tests

pub mod app;
pub mod cli;
pub mod logging;
