//! Replica health from `SHOW SLAVE STATUS`
//!
//! A replica is broken if either its IO thread (pulling the binlog from the
//! primary) or its SQL thread (applying it) has stopped, no matter how far
//! behind it claims to be. If both are running, lag decides.

use std::cmp::max;
use std::collections::BTreeMap;

use crate::thresholds::Thresholds;
use crate::{Report, Status};

const IO_RUNNING: &[&str] = &["Slave_IO_Running", "Replica_IO_Running"];
const SQL_RUNNING: &[&str] = &["Slave_SQL_Running", "Replica_SQL_Running"];
const LAG: &[&str] = &["Seconds_Behind_Master", "Seconds_Behind_Source"];
const LAST_SQL_ERROR: &[&str] = &["Last_SQL_Error"];
const LAST_IO_ERROR: &[&str] = &["Last_IO_Error"];

/// One row of `SHOW SLAVE STATUS`: column name to value, `None` for NULL
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplicaStatus {
    fields: BTreeMap<String, Option<String>>,
}

impl ReplicaStatus {
    pub fn from_fields<I, S>(fields: I) -> ReplicaStatus
    where
        I: IntoIterator<Item = (S, Option<String>)>,
        S: Into<String>,
    {
        ReplicaStatus {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Every column, in name order
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_ref().map(String::as_str)))
    }

    fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.fields.contains_key(*name))
    }

    /// The first of `names` that is a column, and its value
    fn get(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .next()
            .and_then(|v| v.as_ref().map(String::as_str))
    }

    pub fn io_running(&self) -> bool {
        is_yes(self.get(IO_RUNNING))
    }

    pub fn sql_running(&self) -> bool {
        is_yes(self.get(SQL_RUNNING))
    }

    /// `None` if the server reported NULL or the column is missing
    pub fn seconds_behind(&self) -> Option<u64> {
        self.get(LAG).and_then(|lag| lag.trim().parse().ok())
    }

    /// Log the columns we expected but did not find
    fn warn_missing_columns(&self) {
        for names in &[IO_RUNNING, SQL_RUNNING, LAG, LAST_SQL_ERROR, LAST_IO_ERROR] {
            if !self.has_any(names) {
                tracing::warn!(column = names[0], "couldn't detect replication status");
            }
        }
    }

    /// Judge a single replication channel
    pub fn evaluate(&self, thresholds: &Thresholds) -> Report {
        self.warn_missing_columns();
        let io = self.io_running();
        let sql = self.sql_running();
        if !(io && sql) {
            let stopped = match (io, sql) {
                (false, false) => "IO and SQL threads",
                (false, true) => "IO thread",
                _ => "SQL thread",
            };
            let mut msg = format!(
                "Slave not running! {} stopped. STATES: Slave_IO_Running={}, Slave_SQL_Running={}, \
                 LAST ERROR: {}",
                stopped,
                self.get(IO_RUNNING).unwrap_or("NULL"),
                self.get(SQL_RUNNING).unwrap_or("NULL"),
                self.get(LAST_SQL_ERROR).unwrap_or("")
            );
            if !io {
                if let Some(err) = self.get(LAST_IO_ERROR).filter(|e| !e.is_empty()) {
                    msg.push_str(&format!(", LAST IO ERROR: {}", err));
                }
            }
            return Report::critical(msg);
        }

        let lag = match self.seconds_behind() {
            Some(lag) => lag,
            None => {
                tracing::warn!("threads are running but Seconds_Behind_Master is NULL");
                0
            }
        };
        let message = format!("replication delayed by {}", lag);
        match thresholds.evaluate_lag(lag as f64) {
            Status::Ok => Report::ok(format!("slave running: true, {}", message)),
            status => Report::new(status, message),
        }
    }
}

fn is_yes(value: Option<&str>) -> bool {
    value.map_or(false, |v| v.contains("Yes"))
}

/// Judge every replication channel and keep the worst
///
/// No channels at all means this server is not a replica, which is fine.
pub fn evaluate(channels: &[ReplicaStatus], thresholds: &Thresholds) -> Report {
    let mut worst: Option<Report> = None;
    for channel in channels {
        let report = channel.evaluate(thresholds);
        worst = Some(match worst {
            Some(prev) => {
                if max(prev.status, report.status) == prev.status {
                    prev
                } else {
                    report
                }
            }
            None => report,
        });
    }
    worst.unwrap_or_else(|| {
        Report::ok("show slave status returned no rows. This server is not a replica.")
    })
}

#[cfg(test)]
mod test {
    use super::{evaluate, ReplicaStatus};
    use crate::thresholds::Thresholds;
    use crate::Status;

    fn row(io: &str, sql: &str, lag: Option<&str>, sql_error: &str) -> ReplicaStatus {
        ReplicaStatus::from_fields(vec![
            ("Slave_IO_State", Some("Waiting for master to send event".to_owned())),
            ("Slave_IO_Running", Some(io.to_owned())),
            ("Slave_SQL_Running", Some(sql.to_owned())),
            ("Last_IO_Error", Some(String::new())),
            ("Last_SQL_Error", Some(sql_error.to_owned())),
            ("Seconds_Behind_Master", lag.map(str::to_owned)),
        ])
    }

    fn thresholds() -> Thresholds {
        Thresholds::new(900.0, 1800.0)
    }

    #[test]
    fn not_a_replica_is_ok() {
        let report = evaluate(&[], &thresholds());
        assert_eq!(report.status, Status::Ok);
        assert!(report.message.contains("not a replica"));
    }

    #[test]
    fn healthy_replica() {
        let report = evaluate(&[row("Yes", "Yes", Some("3"), "")], &thresholds());
        assert_eq!(report.status, Status::Ok);
        assert_eq!(report.message, "slave running: true, replication delayed by 3");
    }

    #[test]
    fn lag_thresholds() {
        let t = thresholds();
        let status = |lag: &str| evaluate(&[row("Yes", "Yes", Some(lag), "")], &t).status;
        assert_eq!(status("900"), Status::Ok);
        assert_eq!(status("901"), Status::Warning);
        assert_eq!(status("1800"), Status::Critical);
        assert_eq!(status("5000"), Status::Critical);

        let report = evaluate(&[row("Yes", "Yes", Some("1000"), "")], &t);
        assert_eq!(report.message, "replication delayed by 1000");
    }

    #[test]
    fn stopped_sql_thread_is_critical_regardless_of_lag() {
        let report = evaluate(
            &[row(
                "Yes",
                "No",
                Some("0"),
                "Error 'Duplicate entry '1' for key 'PRIMARY'' on query.",
            )],
            &thresholds(),
        );
        assert_eq!(report.status, Status::Critical);
        assert_eq!(
            report.message,
            "Slave not running! SQL thread stopped. STATES: Slave_IO_Running=Yes, \
             Slave_SQL_Running=No, LAST ERROR: Error 'Duplicate entry '1' for key \
             'PRIMARY'' on query."
        );
    }

    #[test]
    fn stopped_io_thread_names_the_io_error() {
        let mut fields: Vec<(String, Option<String>)> = row("Connecting", "Yes", None, "")
            .fields()
            .map(|(k, v)| (k.to_owned(), v.map(str::to_owned)))
            .collect();
        for field in fields.iter_mut() {
            if field.0 == "Last_IO_Error" {
                field.1 = Some("error connecting to master 'repl@db01:3306'".to_owned());
            }
        }
        let report = evaluate(&[ReplicaStatus::from_fields(fields)], &thresholds());
        assert_eq!(report.status, Status::Critical);
        assert!(report.message.contains("IO thread stopped"));
        assert!(report.message.contains("Slave_IO_Running=Connecting"));
        assert!(report
            .message
            .ends_with(", LAST IO ERROR: error connecting to master 'repl@db01:3306'"));
    }

    #[test]
    fn both_threads_stopped() {
        let report = evaluate(&[row("No", "No", None, "")], &thresholds());
        assert_eq!(report.status, Status::Critical);
        assert!(report.message.contains("IO and SQL threads stopped"));
    }

    #[test]
    fn missing_columns_count_as_not_running() {
        let status = ReplicaStatus::from_fields(vec![("Seconds_Behind_Master", Some("0".to_owned()))]);
        assert_eq!(evaluate(&[status], &thresholds()).status, Status::Critical);
    }

    #[test]
    fn null_lag_with_running_threads_is_zero() {
        let report = evaluate(&[row("Yes", "Yes", None, "")], &thresholds());
        assert_eq!(report.status, Status::Ok);
        assert!(report.message.ends_with("replication delayed by 0"));
    }

    #[test]
    fn newer_column_names_are_understood() {
        let status = ReplicaStatus::from_fields(vec![
            ("Replica_IO_Running", Some("Yes".to_owned())),
            ("Replica_SQL_Running", Some("Yes".to_owned())),
            ("Seconds_Behind_Source", Some("1000".to_owned())),
        ]);
        assert_eq!(status.seconds_behind(), Some(1000));
        assert_eq!(evaluate(&[status], &thresholds()).status, Status::Warning);
    }

    #[test]
    fn worst_channel_wins() {
        let channels = [
            row("Yes", "Yes", Some("10"), ""),
            row("Yes", "Yes", Some("1000"), ""),
            row("Yes", "Yes", Some("20"), ""),
        ];
        let report = evaluate(&channels, &thresholds());
        assert_eq!(report.status, Status::Warning);
        assert_eq!(report.message, "replication delayed by 1000");
    }
}
