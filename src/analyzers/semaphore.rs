use crate::model::PgsqlMigrability;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metric counting PL/SQL source lines
pub const METRIC_PLSQL_LINES: &str = "PLSQL LINES";

/// Metric counting non PL/SQL constructs needing rework
pub const METRIC_NO_PLSQL_LINES: &str = "NO PLSQL LINES";

/// Largest count still considered a manageable migration
pub const YELLOW_THRESHOLD: i64 = 10_000;

/// Effort label for migrating a database to PostgreSQL
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Semaphore {
    Green,
    Yellow,
    Red,
}

impl Semaphore {
    pub fn as_str(&self) -> &'static str {
        match self {
            Semaphore::Green => "green",
            Semaphore::Yellow => "yellow",
            Semaphore::Red => "red",
        }
    }
}

impl fmt::Display for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Totals of the two metrics that drive the semaphore
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrabilityTotals {
    pub plsql_lines: i64,
    pub no_plsql_lines: i64,
}

impl MigrabilityTotals {
    /// Sum recognised metrics, saturating at `i64::MAX`; other metrics and
    /// negative counts are ignored
    pub fn from_metrics(metrics: &[PgsqlMigrability]) -> Self {
        let mut totals = Self::default();
        for m in metrics {
            let count = m.count.max(0);
            match m.metric.as_deref() {
                Some(METRIC_PLSQL_LINES) => {
                    totals.plsql_lines = totals.plsql_lines.saturating_add(count)
                }
                Some(METRIC_NO_PLSQL_LINES) => {
                    totals.no_plsql_lines = totals.no_plsql_lines.saturating_add(count)
                }
                _ => {}
            }
        }
        totals
    }

    /// The larger of the two totals
    pub fn governing(&self) -> i64 {
        self.plsql_lines.max(self.no_plsql_lines)
    }
}

pub fn classify(metrics: &[PgsqlMigrability]) -> Semaphore {
    let totals = MigrabilityTotals::from_metrics(metrics);

    if totals.plsql_lines <= 0 && totals.no_plsql_lines <= 0 {
        Semaphore::Green
    } else if totals.governing() <= YELLOW_THRESHOLD {
        Semaphore::Yellow
    } else {
        Semaphore::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(name: &str, count: i64) -> PgsqlMigrability {
        PgsqlMigrability {
            metric: Some(name.to_string()),
            schema: Some("test_schema".to_string()),
            object_type: Some("test_objectType".to_string()),
            count,
        }
    }

    fn pair(plsql: i64, no_plsql: i64) -> Vec<PgsqlMigrability> {
        vec![metric(METRIC_PLSQL_LINES, plsql), metric(METRIC_NO_PLSQL_LINES, no_plsql)]
    }

    #[test]
    fn test_green_when_nothing_to_migrate() {
        assert_eq!(classify(&pair(0, 0)), Semaphore::Green);
        assert_eq!(classify(&[]), Semaphore::Green);
    }

    #[test]
    fn test_yellow_below_threshold() {
        assert_eq!(classify(&pair(1000, 0)), Semaphore::Yellow);
        assert_eq!(classify(&pair(10_000, 0)), Semaphore::Yellow);
    }

    #[test]
    fn test_red_above_threshold() {
        assert_eq!(classify(&pair(10_001, 0)), Semaphore::Red);
        assert_eq!(classify(&pair(0, 10_001)), Semaphore::Red);
    }

    #[test]
    fn test_metrics_are_summed() {
        let metrics = vec![
            metric(METRIC_PLSQL_LINES, 6000),
            metric(METRIC_PLSQL_LINES, 5000),
            metric(METRIC_NO_PLSQL_LINES, 0),
        ];
        assert_eq!(MigrabilityTotals::from_metrics(&metrics).plsql_lines, 11_000);
        assert_eq!(classify(&metrics), Semaphore::Red);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let metrics = vec![metric(METRIC_PLSQL_LINES, i64::MAX), metric(METRIC_PLSQL_LINES, 1)];
        assert_eq!(MigrabilityTotals::from_metrics(&metrics).plsql_lines, i64::MAX);
        assert_eq!(classify(&metrics), Semaphore::Red);

        let metrics = vec![metric(METRIC_NO_PLSQL_LINES, i64::MAX), metric(METRIC_NO_PLSQL_LINES, i64::MAX)];
        assert_eq!(classify(&metrics), Semaphore::Red);
    }

    #[test]
    fn test_unknown_and_missing_metrics_ignored() {
        let mut unnamed = metric("", 50_000);
        unnamed.metric = None;
        let metrics = vec![metric("TABLES", 50_000), unnamed, metric(METRIC_PLSQL_LINES, -5)];
        assert_eq!(classify(&metrics), Semaphore::Green);
    }

    #[test]
    fn test_label_serialization() {
        assert_eq!(Semaphore::Yellow.to_string(), "yellow");
        assert_eq!(serde_json::to_string(&Semaphore::Red).unwrap(), "\"red\"");
    }
}
