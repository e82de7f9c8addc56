// file: src/utils/telemetry.rs
// description: component health reporting for the check command and operation timing
// reference: backs `resume_ranker check`

use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Ordered from best to worst, so the report status is the maximum.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (icon, label) = match self {
            HealthStatus::Healthy => ("✓", "healthy"),
            HealthStatus::Degraded => ("⚠", "degraded"),
            HealthStatus::Unhealthy => ("✗", "unhealthy"),
        };
        write!(f, "{} {}", icon, label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub component: String,
    pub status: HealthStatus,
    pub detail: String,
    pub elapsed_ms: u64,
}

impl HealthCheck {
    pub fn new(
        component: impl Into<String>,
        status: HealthStatus,
        detail: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            component: component.into(),
            status,
            detail: detail.into(),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Result of `check`: the embedding model probe plus the resumes directory.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub checked_at: String,
    pub version: &'static str,
}

impl HealthReport {
    pub fn new(checks: Vec<HealthCheck>) -> Self {
        let status = checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(HealthStatus::Healthy);

        Self {
            status,
            checks,
            checked_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Degraded components still allow ranking.
    pub fn is_healthy(&self) -> bool {
        self.status < HealthStatus::Unhealthy
    }

    pub fn failing(&self) -> impl Iterator<Item = &HealthCheck> {
        self.checks
            .iter()
            .filter(|c| c.status == HealthStatus::Unhealthy)
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "resume_ranker {} ({}) at {}",
            self.version, self.status, self.checked_at
        )?;
        for check in &self.checks {
            writeln!(
                f,
                "  {:<18} {:<12} {:>5}ms  {}",
                check.component,
                check.status.to_string(),
                check.elapsed_ms,
                check.detail
            )?;
        }
        Ok(())
    }
}

/// Logs how long a named operation took once finished.
pub struct OperationTimer {
    label: &'static str,
    start: Instant,
}

impl OperationTimer {
    pub fn new(label: &'static str) -> Self {
        debug!(operation = label, "started");
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            operation = self.label,
            elapsed_ms = elapsed.as_millis() as u64,
            "finished"
        );
        elapsed
    }

    pub fn finish_with_count(self, items: usize) -> Duration {
        let elapsed = self.elapsed();
        info!(
            operation = self.label,
            items,
            elapsed_ms = elapsed.as_millis() as u64,
            "finished"
        );
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(status: HealthStatus) -> HealthCheck {
        HealthCheck::new("embedding model", status, "detail", Duration::from_millis(7))
    }

    #[test]
    fn test_report_takes_worst_status() {
        let report = HealthReport::new(vec![
            check(HealthStatus::Healthy),
            check(HealthStatus::Degraded),
        ]);
        assert_eq!(report.status, HealthStatus::Degraded);
        assert!(report.is_healthy());
        assert_eq!(report.failing().count(), 0);

        let report = HealthReport::new(vec![
            check(HealthStatus::Unhealthy),
            check(HealthStatus::Degraded),
        ]);
        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert!(!report.is_healthy());
        assert_eq!(report.failing().count(), 1);
    }

    #[test]
    fn test_empty_report_is_healthy() {
        assert!(HealthReport::new(Vec::new()).is_healthy());
    }

    #[test]
    fn test_display_lists_every_component() {
        let report = HealthReport::new(vec![
            HealthCheck::new(
                "embedding model",
                HealthStatus::Unhealthy,
                "connection refused",
                Duration::from_millis(3),
            ),
            HealthCheck::new(
                "resumes directory",
                HealthStatus::Healthy,
                "./resumes",
                Duration::ZERO,
            ),
        ]);

        let text = report.to_string();
        assert!(text.contains("✗ unhealthy"));
        assert!(text.contains("connection refused"));
        assert!(text.contains("./resumes"));
    }

    #[test]
    fn test_operation_timer_measures_elapsed() {
        let timer = OperationTimer::new("test");
        std::thread::sleep(Duration::from_millis(10));
        assert!(timer.finish_with_count(3) >= Duration::from_millis(10));
    }
}
