//! How much of the data disk the databases use

use crate::thresholds::Thresholds;
use crate::{Report, Status};

/// One row of the per-schema size query
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSize {
    pub schema: String,
    pub tables: u64,
    /// Data plus indexes, in GB
    pub total_gb: f64,
}

/// Sum of every schema's size in GB
pub fn used_size(schemas: &[SchemaSize]) -> f64 {
    schemas.iter().fold(0.0, |acc, s| acc + s.total_gb)
}

pub fn usage_percent(used_gb: f64, capacity_gb: f64) -> f64 {
    used_gb / capacity_gb * 100.0
}

/// Compare total database size against the disk's `capacity_gb`
pub fn evaluate(schemas: &[SchemaSize], capacity_gb: f64, thresholds: &Thresholds) -> Report {
    for s in schemas {
        tracing::debug!(schema = %s.schema, tables = s.tables, size_gb = s.total_gb, "schema");
    }
    let used = used_size(schemas);
    let percent = usage_percent(used, capacity_gb);
    let summary = format!("DB size: {:.2}, disk use: {:.2}%", used, percent);
    let status = thresholds.evaluate(percent);
    match status {
        Status::Ok => Report::ok(summary),
        status => Report::new(
            status,
            format!(
                "Database size exceeds {} threshold: {}",
                status.to_string().to_lowercase(),
                summary
            ),
        ),
    }
}

#[cfg(test)]
mod test {
    use super::{evaluate, used_size, SchemaSize};
    use crate::thresholds::Thresholds;
    use crate::Status;

    fn schema(name: &str, total_gb: f64) -> SchemaSize {
        SchemaSize {
            schema: name.to_owned(),
            tables: 12,
            total_gb,
        }
    }

    #[test]
    fn sizes_are_summed() {
        let schemas = vec![schema("app", 60.5), schema("mysql", 0.0), schema("logs", 29.5)];
        assert_eq!(used_size(&schemas), 90.0);
        assert_eq!(used_size(&[]), 0.0);
        assert!(used_size(&[]).is_sign_positive());
    }

    #[test]
    fn ninety_percent_is_a_warning() {
        let schemas = vec![schema("app", 60.0), schema("logs", 30.0)];
        let report = evaluate(&schemas, 100.0, &Thresholds::new(85.0, 95.0));
        assert_eq!(report.status, Status::Warning);
        assert_eq!(
            report.message,
            "Database size exceeds warning threshold: DB size: 90.00, disk use: 90.00%"
        );
    }

    #[test]
    fn critical_and_ok() {
        let t = Thresholds::new(85.0, 95.0);
        let report = evaluate(&[schema("app", 190.0)], 200.0, &t);
        assert_eq!(report.status, Status::Critical);
        assert_eq!(
            report.message,
            "Database size exceeds critical threshold: DB size: 190.00, disk use: 95.00%"
        );

        let report = evaluate(&[schema("app", 12.34)], 200.0, &t);
        assert_eq!(report.status, Status::Ok);
        assert_eq!(report.message, "DB size: 12.34, disk use: 6.17%");
    }

    #[test]
    fn empty_server_is_ok() {
        let report = evaluate(&[], 100.0, &Thresholds::new(85.0, 95.0));
        assert_eq!(report.status, Status::Ok);
        assert_eq!(report.message, "DB size: 0.00, disk use: 0.00%");
    }
}
