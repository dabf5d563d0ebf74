//! Source collection
//!
//! One tokio task per configured source. Tasks share nothing; each returns a
//! finished `SourceReport` through its join handle and the collector awaits
//! the handles in configured order, so completion order never shows in the
//! output.

use crate::config::{Config, SensorBackend, SourceKind};
use crate::sensors::{self, HwmonProvider, LmSensorsProvider, SensorProvider, SensorSourceConfig};
use crate::status::{SourceReport, Tier};
use crate::systemd::{self, SystemctlProvider, UnitProvider, UnitSourceConfig};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error};

type SourceFuture = Pin<Box<dyn Future<Output = SourceReport> + Send + 'static>>;

/// A source ready to be spawned
pub struct SourceTask {
    title: String,
    future: SourceFuture,
}

impl SourceTask {
    pub fn new<F>(title: impl Into<String>, future: F) -> Self
    where
        F: Future<Output = SourceReport> + Send + 'static,
    {
        Self {
            title: title.into(),
            future: Box::pin(future),
        }
    }

    pub fn units<P>(provider: P, config: UnitSourceConfig, timeout: Duration) -> Self
    where
        P: UnitProvider + Send + Sync + 'static,
    {
        Self::new(systemd::SOURCE_TITLE, async move {
            systemd::collect(&provider, &config, timeout).await
        })
    }

    pub fn sensors<P>(provider: P, config: SensorSourceConfig, timeout: Duration) -> Self
    where
        P: SensorProvider + Send + Sync + 'static,
    {
        Self::new(sensors::SOURCE_TITLE, async move {
            sensors::collect(&provider, &config, timeout).await
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Tasks for every enabled source, wired to the real providers
pub fn tasks_from_config(config: &Config) -> Vec<SourceTask> {
    let timeout = config.timeout();

    config
        .enabled_sources()
        .into_iter()
        .map(|kind| match kind {
            SourceKind::Systemd => {
                SourceTask::units(SystemctlProvider::new(), config.unit_source(), timeout)
            }
            SourceKind::CpuTemp => match config.cpu_temp.backend {
                SensorBackend::Sysfs => SourceTask::sensors(
                    HwmonProvider::new(config.cpu_temp.hwmon_root.clone()),
                    config.sensor_source(),
                    timeout,
                ),
                SensorBackend::Exec => SourceTask::sensors(
                    LmSensorsProvider::default(),
                    config.sensor_source(),
                    timeout,
                ),
            },
        })
        .collect()
}

/// Run every task concurrently and return the reports in task order.
///
/// A task that dies (panic, runtime shutdown) still yields a Critical
/// "unavailable" report so the document keeps one section per source.
pub async fn run_all(tasks: Vec<SourceTask>) -> Vec<SourceReport> {
    let handles: Vec<_> = tasks
        .into_iter()
        .map(|task| (task.title, tokio::spawn(task.future)))
        .collect();
    debug!("Spawned {} source tasks", handles.len());

    let mut reports = Vec::with_capacity(handles.len());
    for (title, handle) in handles {
        match handle.await {
            Ok(report) => reports.push(report),
            Err(err) => {
                error!("Source task {} did not complete: {}", title, err);
                reports.push(SourceReport::header_only(title, Tier::Critical, "unavailable"));
            }
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exploding_probe() -> SourceReport {
        panic!("probe exploded")
    }

    #[tokio::test]
    async fn test_reports_follow_task_order() {
        let tasks = vec![
            SourceTask::new("Slow", async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                SourceReport::header_only("Slow", Tier::Good, "OK")
            }),
            SourceTask::new("Fast", async {
                SourceReport::header_only("Fast", Tier::Warning, "warning")
            }),
        ];

        let reports = run_all(tasks).await;
        let titles: Vec<&str> = reports.iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["Slow", "Fast"]);
    }

    #[tokio::test]
    async fn test_panicking_task_degrades() {
        let tasks = vec![
            SourceTask::new("Broken", async { exploding_probe() }),
            SourceTask::new("Fine", async {
                SourceReport::header_only("Fine", Tier::Good, "OK")
            }),
        ];

        let reports = run_all(tasks).await;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].title(), "Broken");
        assert_eq!(reports[0].header_tier(), Tier::Critical);
        assert_eq!(reports[0].header_label(), "unavailable");
        assert_eq!(reports[1].header_label(), "OK");
    }

    #[test]
    fn test_tasks_from_config_respects_order_and_enabled() {
        let mut config = Config {
            show_order: vec![SourceKind::CpuTemp, SourceKind::Systemd],
            ..Default::default()
        };
        let titles: Vec<String> = tasks_from_config(&config)
            .iter()
            .map(|t| t.title().to_string())
            .collect();
        assert_eq!(titles, vec!["CPU temp", "Systemd"]);

        config.systemd.enabled = false;
        assert_eq!(tasks_from_config(&config).len(), 1);
    }
}
