//! Unit facts from the service manager
//!
//! The real provider shells out to `systemctl` (read-only queries only).
//! Citation: [archwiki:Systemd#Basic_systemctl_usage]

use super::fact::{UnitFact, UnitListing};
use crate::error::ProbeError;
use std::future::Future;
use tokio::process::Command;
use tracing::{debug, warn};

/// Properties requested for every unit
pub const UNIT_PROPERTIES: &str = "ActiveState,LoadState,Result,ExecMainStatus";

/// Source of unit facts
pub trait UnitProvider {
    /// Look up the named units, plus every failed unit when
    /// `include_failed` is set. Per-unit failures go into
    /// `UnitListing::errors`; an `Err` means the service manager could not
    /// be reached at all.
    fn list_units(
        &self,
        names: &[String],
        include_failed: bool,
    ) -> impl Future<Output = Result<UnitListing, ProbeError>> + Send;
}

enum CommandError {
    /// The program could not be started
    Spawn(std::io::Error),
    /// The program ran and exited non-zero
    Exit(String),
}

/// Provider backed by the `systemctl` command
#[derive(Debug, Clone)]
pub struct SystemctlProvider {
    program: String,
}

impl Default for SystemctlProvider {
    fn default() -> Self {
        Self {
            program: "systemctl".to_string(),
        }
    }
}

impl SystemctlProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different binary, e.g. a wrapper script
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String, CommandError> {
        let output = Command::new(&self.program)
            .args(args)
            .env("LC_ALL", "C")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(CommandError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                stderr
            };
            return Err(CommandError::Exit(reason));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn unavailable(&self, reason: impl ToString) -> ProbeError {
        ProbeError::ProviderUnavailable {
            provider: "systemd",
            reason: reason.to_string(),
        }
    }
}

impl UnitProvider for SystemctlProvider {
    async fn list_units(
        &self,
        names: &[String],
        include_failed: bool,
    ) -> Result<UnitListing, ProbeError> {
        let mut listing = UnitListing::default();

        if include_failed {
            let args = [
                "list-units",
                "--state=failed",
                "--all",
                "--full",
                "--plain",
                "--no-legend",
                "--no-pager",
            ];
            match self.run(&args).await {
                Ok(stdout) => {
                    for fact in parse_failed_units(&stdout) {
                        listing.insert(fact);
                    }
                }
                Err(CommandError::Spawn(err)) => return Err(self.unavailable(err)),
                Err(CommandError::Exit(reason)) => return Err(self.unavailable(reason)),
            }
            debug!("{} failed units listed", listing.facts.len());
        }

        for name in names {
            listing.insert(UnitFact::new(name.clone()));
        }

        let mut errors = Vec::new();
        for fact in listing.facts.values_mut() {
            if fact.is_complete() {
                continue;
            }

            let property_arg = format!("--property={}", UNIT_PROPERTIES);
            let args = ["show", property_arg.as_str(), "--", fact.name.as_str()];
            match self.run(&args).await {
                Ok(stdout) => {
                    for (key, value) in parse_show_output(&stdout) {
                        fact.set_property(key, value);
                    }
                }
                Err(CommandError::Spawn(err)) => return Err(self.unavailable(err)),
                Err(CommandError::Exit(reason)) => {
                    warn!("Failed to get properties for {}: {}", fact.name, reason);
                    errors.push(ProbeError::item_read(fact.name.clone(), reason));
                }
            }
        }
        listing.errors = errors;

        Ok(listing)
    }
}

/// Parse `systemctl show` output into `(key, value)` pairs
pub fn parse_show_output(output: &str) -> impl Iterator<Item = (&str, &str)> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
}

/// Parse `systemctl list-units --plain --no-legend` output.
///
/// Columns are UNIT LOAD ACTIVE SUB DESCRIPTION; a status bullet may
/// precede the unit name on some systemd versions.
pub fn parse_failed_units(output: &str) -> Vec<UnitFact> {
    let mut units = Vec::new();

    for line in output.lines() {
        let mut parts = line
            .split_whitespace()
            .skip_while(|part| *part == "●" || *part == "*");

        let (Some(name), Some(load), Some(active)) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        let mut fact = UnitFact::new(name);
        fact.set_property("LoadState", load);
        fact.set_property("ActiveState", active);
        units.push(fact);
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_show_output() {
        let output = "ActiveState=failed\nLoadState=loaded\nResult=exit-code\nExecMainStatus=203\n";
        let mut fact = UnitFact::new("foo.service");
        for (key, value) in parse_show_output(output) {
            fact.set_property(key, value);
        }
        assert!(fact.is_complete());
        assert_eq!(fact.result.as_deref(), Some("exit-code"));
        assert_eq!(fact.exec_main_status.as_deref(), Some("203"));
    }

    #[test]
    fn test_parse_show_output_empty_values() {
        let output = "ActiveState=inactive\nLoadState=loaded\nResult=\nExecMainStatus=\n";
        let mut fact = UnitFact::new("fstrim.timer");
        for (key, value) in parse_show_output(output) {
            fact.set_property(key, value);
        }
        assert_eq!(fact.active_state.as_deref(), Some("inactive"));
        assert!(fact.result.is_none());
        assert!(fact.exec_main_status.is_none());
    }

    #[test]
    fn test_parse_failed_units() {
        let output = "\
foo.service          loaded failed failed Foo daemon
● bar.mount          loaded failed failed /bar
short line
";
        let units = parse_failed_units(output);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name, "foo.service");
        assert_eq!(units[0].active_state.as_deref(), Some("failed"));
        assert_eq!(units[1].name, "bar.mount");
        assert_eq!(units[1].load_state.as_deref(), Some("loaded"));
        assert!(units[1].result.is_none());
    }

    #[test]
    fn test_parse_failed_units_empty() {
        assert!(parse_failed_units("").is_empty());
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let provider = SystemctlProvider::with_program("/nonexistent/healthline-systemctl");
        let result = provider
            .list_units(&["sshd.service".to_string()], false)
            .await;
        assert!(matches!(
            result,
            Err(ProbeError::ProviderUnavailable { provider: "systemd", .. })
        ));
    }
}
