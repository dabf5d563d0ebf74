//! healthline common - status classification and aggregation
//!
//! Gathers facts from local sources (systemd units, CPU sensors), classifies
//! each one as Good, Warning or Critical and reduces every source to a
//! single report with an aggregate header.

pub mod config;
pub mod error;
pub mod render;
pub mod runner;
pub mod sensors;
pub mod status;
pub mod systemd;

pub use config::{Config, SensorBackend, SourceKind};
pub use error::{ConfigError, ProbeError};
pub use render::Presentation;
pub use runner::{run_all, tasks_from_config, SourceTask};
pub use status::{Item, SourceReport, Tier, TierCounts};
